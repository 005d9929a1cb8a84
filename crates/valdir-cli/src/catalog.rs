use std::sync::Arc;

use clap::Subcommand;
use valdir_core::{
    catalog::{find_category, toggle_category, visible_categories},
    contact::{interest_link, product_share_url},
    Product, SearchScope, SelectedStoreState,
};

use crate::Context;

#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// List products, newest first
    List {
        /// Case- and accent-insensitive search over name, description and category
        #[arg(long)]
        search: Option<String>,
        /// Category id; replaces the search term, or clears it when it
        /// equals the current --search
        #[arg(long)]
        category: Option<String>,
    },
    /// List product categories
    Categories {
        /// Include the categories shown only on small screens
        #[arg(long)]
        compact: bool,
    },
    /// Show one product
    Show { id: i64 },
    /// Print the messaging link to ask the selected store about a product
    Interest { id: i64 },
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn print_products(products: &[&Product], scope: SearchScope) {
    if products.is_empty() {
        println!("Nenhum produto encontrado.");
        return;
    }
    println!("{:<8}{:<12}{:<42}PREÇO", "ID", "REF", "PRODUTO");
    for product in products {
        println!(
            "{:<8}{:<12}{:<42}{}",
            product.id,
            truncate(&product.reference(), 10),
            truncate(&product.name, 38),
            product.price_display().full_label(scope.on_request_label())
        );
    }
}

async fn fetch(ctx: &Context, id: i64) -> anyhow::Result<Product> {
    ctx.backend()?
        .get_product(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product {id} not found"))
}

/// # Errors
///
/// Returns an error if the backend request fails, the product does not
/// exist, or an unknown category is given.
pub(crate) async fn run(ctx: &Context, command: CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::List { search, category } => {
            let search = search.unwrap_or_default();
            let term = match category {
                Some(id) => {
                    let category = find_category(&id)
                        .ok_or_else(|| anyhow::anyhow!("unknown category '{id}'"))?;
                    toggle_category(&search, category.id)
                }
                None => search,
            };
            let products = ctx.backend()?.list_products().await?;
            let scope = SearchScope::Storefront;
            print_products(&scope.filter(&products, &term), scope);
        }
        CatalogCommands::Categories { compact } => {
            for category in visible_categories(compact) {
                println!("{:<16}{}", category.id, category.name);
            }
        }
        CatalogCommands::Show { id } => {
            let product = fetch(ctx, id).await?;
            let scope = SearchScope::Storefront;
            println!("{}", product.name);
            println!("REF: {}", product.reference());
            println!(
                "Preço: {}",
                product.price_display().full_label(scope.on_request_label())
            );
            if let Some(category) = &product.category {
                println!("Categoria: {category}");
            }
            if let Some(description) = &product.description {
                println!();
                println!("{description}");
            }
            for image in &product.images {
                println!("Imagem: {image}");
            }
            println!("Link: {}", product_share_url(&ctx.config.site_url, product.id));
        }
        CatalogCommands::Interest { id } => {
            let product = fetch(ctx, id).await?;
            let selected = SelectedStoreState::new(Arc::clone(&ctx.storage)).read()?;
            if selected.is_none() {
                tracing::info!("no store selected; using the default store");
            }
            println!("{}", interest_link(&product, selected.as_ref(), &ctx.data));
        }
    }
    Ok(())
}
