use crate::model::SummaryInput;

/// Sample history written into an empty store on first run.
pub fn sample_summaries() -> Vec<SummaryInput> {
    vec![
        SummaryInput {
            title: "Groceries".to_string(),
            date: "2025-03-28".to_string(),
            time: "18:30".to_string(),
            budget: 2500.0,
            total_spent: 2000.0,
            remaining: 500.0,
            categories: "Food:1500, Essentials:500".to_string(),
            description: "Monthly stock-up including bulk pantry items".to_string(),
        },
        SummaryInput {
            title: "Weekend Trip".to_string(),
            date: "2025-03-15".to_string(),
            time: "10:15".to_string(),
            budget: 800.0,
            total_spent: 650.0,
            remaining: 150.0,
            categories: "Transportation:300, Food:200, Entertainment:150".to_string(),
            description: "Two nights away, train tickets booked early".to_string(),
        },
        SummaryInput {
            title: "Rent & Utilities".to_string(),
            date: "2025-03-01".to_string(),
            time: "09:00".to_string(),
            budget: 2200.0,
            total_spent: 2000.0,
            remaining: 200.0,
            categories: "Rent:1600, Utilities:400".to_string(),
            description: "Fixed monthly housing costs".to_string(),
        },
        SummaryInput {
            title: "Groceries".to_string(),
            date: "2025-02-27".to_string(),
            time: "17:45".to_string(),
            budget: 1200.0,
            total_spent: 1000.0,
            remaining: 200.0,
            categories: "Food:500, Essentials:500".to_string(),
            description: "Regular weekly shopping".to_string(),
        },
        SummaryInput {
            title: "Holiday Shopping".to_string(),
            date: "2024-12-20".to_string(),
            time: "14:00".to_string(),
            budget: 1000.0,
            total_spent: 900.0,
            remaining: 100.0,
            categories: "Gifts:700, Food:200".to_string(),
            description: "Presents and the family dinner".to_string(),
        },
    ]
}
