use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::daemon::storage::{error::StoreError, usage_store::UsageStore};

use super::output::{print_json, Painter};

#[derive(Debug, Parser)]
pub struct CategorizeCommand {
    #[arg(help = "Application name as shown by `studytrack apps`")]
    app: String,
    #[arg(help = "New type, for example \"study\" or \"other\"")]
    category: String,
}

#[derive(Debug, Parser)]
pub struct CategoryCommand {
    #[arg(help = "Application name as shown by `studytrack apps`")]
    app: String,
}

#[derive(Debug, Parser)]
pub struct AppsCommand {
    #[arg(long, help = "Print json instead of a table")]
    json: bool,
}

/// Changes the type of an app. Applies to its whole history.
pub async fn process_categorize_command(
    store: &impl UsageStore,
    CategorizeCommand { app, category }: CategorizeCommand,
) -> Result<()> {
    match store.set_category_type(&app, &category).await {
        Ok(()) => {
            info!("Recategorized {app} as {category}");
            println!("{app} is now {}", category.trim());
            Ok(())
        }
        Err(StoreError::UnknownApp { app_name }) => {
            anyhow::bail!("{app_name} was never tracked. Run `studytrack apps` to see known apps")
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn process_category_command(
    store: &impl UsageStore,
    CategoryCommand { app }: CategoryCommand,
) -> Result<()> {
    let category = store.get_category(&app).await?;
    println!("{category}");
    Ok(())
}

pub async fn process_apps_command(
    store: &impl UsageStore,
    AppsCommand { json }: AppsCommand,
) -> Result<()> {
    let records = store.list_categories().await?;
    if json {
        return print_json(&records);
    }
    let painter = Painter::detect();
    for record in records {
        println!("{}\t{}", painter.category(&record.category), record.app_name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use crate::daemon::storage::usage_store::{SqliteUsageStore, UsageStore};

    use super::{process_categorize_command, CategorizeCommand};

    #[tokio::test]
    async fn categorize_unknown_app_is_an_error() -> Result<()> {
        let store = SqliteUsageStore::open_in_memory()?;

        let result = process_categorize_command(
            &store,
            CategorizeCommand {
                app: "anki".into(),
                category: "study".into(),
            },
        )
        .await;

        assert!(result.is_err_and(|e| e.to_string().contains("never tracked")));
        Ok(())
    }

    #[tokio::test]
    async fn categorize_known_app() -> Result<()> {
        let store = SqliteUsageStore::open_in_memory()?;
        store
            .append_usage("anki", 5, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await?;

        process_categorize_command(
            &store,
            CategorizeCommand {
                app: "anki".into(),
                category: " study ".into(),
            },
        )
        .await?;

        assert_eq!(&*store.get_category("anki").await?, "study");
        Ok(())
    }
}
