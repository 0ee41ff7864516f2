//! The dashboard page: a per-category summary and a table of every stored transaction.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::Category,
    html::{
        CATEGORY_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, TABLE_STYLE, base, format_optional_rwf, format_rwf,
    },
    transaction::{Transaction, get_all_transactions, get_total_amount},
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The number of transactions in a category and the sum of their known amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: Category,
    pub count: u32,
    pub total: i64,
}

/// Summarize the stored transactions per category, in the order of [Category::ALL].
///
/// Categories without transactions are included with a count and total of zero.
pub fn summarize_by_category(connection: &Connection) -> Result<Vec<CategorySummary>, Error> {
    let totals: Result<HashMap<Category, (u32, i64)>, rusqlite::Error> = connection
        .prepare("SELECT category, COUNT(1), SUM(amount) FROM transactions GROUP BY category")?
        .query_map((), |row| {
            let category = row.get(0)?;
            let count = row.get(1)?;
            let total: Option<i64> = row.get(2)?;

            Ok((category, (count, total.unwrap_or(0))))
        })?
        .collect();
    let totals = totals?;

    Ok(Category::ALL
        .into_iter()
        .map(|category| {
            let (count, total) = totals.get(&category).copied().unwrap_or((0, 0));

            CategorySummary {
                category,
                count,
                total,
            }
        })
        .collect())
}

fn summary_table(summaries: &[CategorySummary], total_amount: Option<i64>) -> Markup {
    html!(
        table id="category-summary" class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                }
            }

            tbody
            {
                @for summary in summaries {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (summary.category.display_name()) }
                        td class=(TABLE_CELL_STYLE) { (summary.count) }
                        td class=(TABLE_CELL_STYLE) { (format_rwf(summary.total)) }
                    }
                }
            }

            tfoot
            {
                tr class="font-semibold text-gray-900 dark:text-white"
                {
                    th scope="row" class=(TABLE_CELL_STYLE) { "All" }
                    td class=(TABLE_CELL_STYLE)
                    {
                        (summaries.iter().map(|summary| summary.count).sum::<u32>())
                    }
                    td class=(TABLE_CELL_STYLE) { (format_rwf(total_amount.unwrap_or(0))) }
                }
            }
        }
    )
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    html!(
        table id="transactions" class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Transaction ID" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Message" }
                }
            }

            tbody
            {
                @for transaction in transactions {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td class=(TABLE_CELL_STYLE) { (transaction.readable_date) }
                        td class=(TABLE_CELL_STYLE) { (transaction.transaction_id) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            span class=(CATEGORY_BADGE_STYLE)
                            {
                                (transaction.category.display_name())
                            }
                        }
                        td class=(TABLE_CELL_STYLE) { (format_optional_rwf(transaction.amount)) }
                        td class=(TABLE_CELL_STYLE) { (format_rwf(transaction.balance)) }
                        td class=(TABLE_CELL_STYLE) { (transaction.body) }
                    }
                }

                @if transactions.is_empty() {
                    tr
                    {
                        td
                            colspan="6"
                            class="px-6 py-4 text-center
                                text-gray-500 dark:text-gray-400"
                        {
                            "No transactions imported yet."
                        }
                    }
                }
            }
        }
    )
}

fn dashboard_view(
    summaries: &[CategorySummary],
    transactions: &[Transaction],
    total_amount: Option<i64>,
) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="relative w-full flex flex-col gap-8"
            {
                section
                {
                    h1 class="text-xl font-bold mb-4" { "Transactions by Category" }

                    div class="dark:bg-gray-800 overflow-x-auto"
                    {
                        (summary_table(summaries, total_amount))
                    }
                }

                section
                {
                    h2 class="text-xl font-bold mb-4" { "All Transactions" }

                    div class="dark:bg-gray-800 overflow-x-auto"
                    {
                        (transactions_table(transactions))
                    }
                }
            }
        }
    );

    base("Dashboard", &content)
}

/// Route handler for the dashboard page.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summaries = summarize_by_category(&connection)
        .inspect_err(|error| tracing::error!("Could not summarize categories: {error}"))?;
    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;
    let total_amount = get_total_amount(&connection)?;

    Ok(dashboard_view(&summaries, &transactions, total_amount).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{ElementRef, Html, Selector};

    use crate::{
        category::Category,
        db::initialize,
        endpoints,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{CategorySummary, DashboardState, get_dashboard_page, summarize_by_category};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert(connection: &Connection, transaction_id: &str, amount: Option<i64>, category: Category) {
        create_transaction(
            &NewTransaction {
                body: format!("Message {transaction_id}"),
                amount,
                balance: 2000,
                readable_date: "10 May 2024 4:30:58 PM".to_owned(),
                category,
                transaction_id: transaction_id.to_owned(),
            },
            connection,
        )
        .expect("Could not create test transaction");
    }

    fn cell_text(row: ElementRef, index: usize) -> String {
        let cell_selector = Selector::parse("td").unwrap();
        row.select(&cell_selector)
            .nth(index)
            .unwrap_or_else(|| panic!("row has no cell {index}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[test]
    fn summarizes_every_category() {
        let connection = get_test_connection();
        insert(&connection, "1", Some(5000), Category::IncomingMoney);
        insert(&connection, "2", Some(1500), Category::IncomingMoney);
        insert(&connection, "3", None, Category::Uncategorized);

        let summaries = summarize_by_category(&connection).unwrap();

        assert_eq!(summaries.len(), Category::ALL.len());
        assert_eq!(
            summaries[0],
            CategorySummary {
                category: Category::IncomingMoney,
                count: 2,
                total: 6500
            }
        );
        assert_eq!(
            summaries[Category::ALL.len() - 1],
            CategorySummary {
                category: Category::Uncategorized,
                count: 1,
                total: 0
            }
        );
        assert!(
            summaries[1..Category::ALL.len() - 1]
                .iter()
                .all(|summary| summary.count == 0 && summary.total == 0)
        );
    }

    #[tokio::test]
    async fn renders_summary_and_transactions() {
        let connection = get_test_connection();
        insert(&connection, "123", Some(5000), Category::IncomingMoney);
        insert(&connection, "1", None, Category::Uncategorized);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::ROOT, get(get_dashboard_page))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());

        let summary_rows: Vec<_> = document
            .select(&Selector::parse("#category-summary tbody tr").unwrap())
            .collect();
        assert_eq!(summary_rows.len(), Category::ALL.len());
        assert_eq!(cell_text(summary_rows[0], 0), "Incoming Money");
        assert_eq!(cell_text(summary_rows[0], 1), "1");
        assert_eq!(cell_text(summary_rows[0], 2), "RWF 5,000");

        let transaction_rows: Vec<_> = document
            .select(&Selector::parse("#transactions tbody tr").unwrap())
            .collect();
        assert_eq!(transaction_rows.len(), 2);
        assert_eq!(cell_text(transaction_rows[0], 1), "123");
        assert_eq!(cell_text(transaction_rows[1], 2), "No category");
        assert_eq!(cell_text(transaction_rows[1], 3), "Unknown");
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let app = Router::new()
            .route(endpoints::ROOT, get(get_dashboard_page))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        let rows: Vec<_> = document
            .select(&Selector::parse("#transactions tbody tr").unwrap())
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(cell_text(rows[0], 0), "No transactions imported yet.");
    }
}
