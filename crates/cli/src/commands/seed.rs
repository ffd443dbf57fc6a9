//! Seed the menu from a YAML file.
//!
//! The file is a list of menu items; any field besides `name`, `price` and
//! `category` is kept as an extra attribute:
//!
//! ```yaml
//! - name: Tomato Soup
//!   price: 6.50
//!   category: soup
//!   recipe: Roasted tomatoes, basil, cream
//!   image: https://cdn.bistro.example/soup.jpg
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use tracing::{error, info};

use bistro_server::db::{self, MenuRepository};
use bistro_server::models::{MenuItem, MenuItemInput};

use super::database_url;

/// Check seed entries before touching the database.
///
/// Returns one message per invalid entry.
fn validate(items: &[MenuItemInput]) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            errors.push(format!("item {index}: name is empty"));
        }
        if item.price <= Decimal::ZERO {
            errors.push(format!("item {index} ({}): price must be positive", item.name));
        }
        if item.category.trim().is_empty() {
            errors.push(format!("item {index} ({}): category is empty", item.name));
        }
    }
    errors
}

fn parse(content: &str) -> Result<Vec<MenuItemInput>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Insert every menu item in `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is
/// invalid, or a database operation fails.
pub async fn menu(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading menu from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let items = parse(&content)?;

    info!(items = items.len(), "Parsed menu");

    let errors = validate(&items);
    if !errors.is_empty() {
        error!("Menu validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = MenuRepository::new(&pool);
    for input in items {
        let item = MenuItem::new(input);
        repo.create(&item).await?;
        info!(menu_item_id = %item.id, name = %item.name, "Inserted menu item");
    }

    info!(total = repo.count().await?, "Seeding complete!");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_extra_fields() {
        let items = parse(
            "- name: Tomato Soup\n  price: 6.50\n  category: soup\n  recipe: Roasted tomatoes\n",
        )
        .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, Decimal::new(65, 1));
        assert_eq!(
            items[0].attributes.get("recipe"),
            Some(&serde_json::json!("Roasted tomatoes"))
        );
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let items = parse(
            "- name: ''\n  price: 0\n  category: soup\n- name: Tea\n  price: 2\n  category: drinks\n",
        )
        .unwrap();

        let errors = validate(&items);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("name is empty"));
        assert!(errors[1].contains("price must be positive"));
    }
}
