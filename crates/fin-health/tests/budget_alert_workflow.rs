use fin_health::workflows::budget::{
    category_spending, evaluate_budget_alerts, import_budget_plans, AlertSession, BudgetPeriod,
    CurrencyFormat,
};
use fin_health::workflows::health::import_transactions;

const PLANS_CSV: &str = "\
id,user_id,category,monthly_limit,month,year
p1,u1,Food,500,6,2024
p2,u1,Fun,200,6,2024
p3,u1,Food,500,7,2024
";

const LEDGER_CSV: &str = "\
id,user_id,title,amount,type,category,date
t1,u1,Groceries,250,expense,Food,2024-06-02
t2,u1,Groceries,175,expense,Food,2024-06-16
t3,u1,Cinema,40,expense,Fun,2024-06-10
t4,u1,Salary,3000,income,Food,2024-06-01
t5,u1,Groceries,430,expense,Food,2024-07-03
";

#[test]
fn alerts_follow_the_selected_month() {
    let plans = import_budget_plans(PLANS_CSV.as_bytes()).expect("plans import");
    let transactions = import_transactions(LEDGER_CSV.as_bytes()).expect("ledger imports");
    let currency = CurrencyFormat::default();
    let mut session = AlertSession::new();

    let june = BudgetPeriod::new(6, 2024).expect("valid period");
    let june_plans: Vec<_> = plans
        .iter()
        .filter(|plan| plan.period() == Some(june))
        .cloned()
        .collect();
    session.select_period(june);
    let spending = category_spending(&transactions, june);
    assert_eq!(spending.get("Food"), Some(&425.0));

    let alerts = evaluate_budget_alerts(
        &june_plans,
        &spending,
        june,
        session.processed(),
        &currency,
    );
    assert_eq!(alerts.len(), 1, "Fun is at 20% and stays quiet");
    assert_eq!(alerts[0].message, "You've used 85% of your Food budget");
    for alert in &alerts {
        session.mark_processed(alert.dedup_key.clone());
    }
    assert!(evaluate_budget_alerts(
        &june_plans,
        &spending,
        june,
        session.processed(),
        &currency
    )
    .is_empty());

    let july = BudgetPeriod::new(7, 2024).expect("valid period");
    let july_plans: Vec<_> = plans
        .iter()
        .filter(|plan| plan.period() == Some(july))
        .cloned()
        .collect();
    session.select_period(july);
    let alerts = evaluate_budget_alerts(
        &july_plans,
        &category_spending(&transactions, july),
        july,
        session.processed(),
        &currency,
    );
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].dedup_key, "Food-7-2024-80");
    assert_eq!(alerts[0].message, "You've used 86% of your Food budget");
}
