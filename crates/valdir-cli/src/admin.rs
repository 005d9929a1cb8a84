//! Admin session and product management commands.
//!
//! Login stores the backend user under the session key; every product
//! command requires that session to exist.

use std::sync::Arc;

use clap::{Args, Subcommand};
use valdir_core::{AdminUser, ProductDraft, SearchScope, SessionState};

use crate::{catalog::print_products, Context};

#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Log in with an admin account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VALDIR_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the admin session
    Logout,
    /// Show the logged-in admin
    Whoami,
    /// List products with admin search rules
    Products {
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
        /// Image URL; repeat for several images
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Update a product; omitted fields keep their value, empty ones are cleared
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        id: i64,
        /// Required; deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

/// Editable product fields as typed on the command line.
#[derive(Debug, Default, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Decimal amount; a comma separator is accepted
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub sale_price: Option<String>,
    #[arg(long)]
    pub item_code: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

impl ProductFields {
    /// Applies the given fields on top of `draft`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price does not parse.
    pub fn apply(self, mut draft: ProductDraft) -> anyhow::Result<ProductDraft> {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = Some(description);
        }
        if let Some(raw) = self.price {
            draft.price = ProductDraft::parse_price("price", &raw)?;
        }
        if let Some(raw) = self.sale_price {
            draft.sale_price = ProductDraft::parse_price("sale_price", &raw)?;
        }
        if let Some(item_code) = self.item_code {
            draft.item_code = Some(item_code);
        }
        if let Some(category) = self.category {
            draft.category = Some(category);
        }
        Ok(draft)
    }
}

fn require_session(session: &SessionState) -> anyhow::Result<AdminUser> {
    session
        .read()?
        .ok_or_else(|| anyhow::anyhow!("not logged in; run `valdir-cli admin login` first"))
}

/// # Errors
///
/// Returns an error if there is no session where one is required, the
/// backend rejects the request, or client storage fails.
pub(crate) async fn run(ctx: &Context, command: AdminCommands) -> anyhow::Result<()> {
    let session = SessionState::new(Arc::clone(&ctx.storage));
    match command {
        AdminCommands::Login { email, password } => {
            let user = ctx.backend()?.authenticate(email.trim(), &password).await?;
            session.write(&user)?;
            println!("Bem-vindo, {}.", user.display_name());
        }
        AdminCommands::Logout => {
            session.clear()?;
            println!("Sessão encerrada.");
        }
        AdminCommands::Whoami => match session.read()? {
            Some(user) => println!("{} <{}>", user.display_name(), user.email),
            None => println!("Nenhum administrador conectado."),
        },
        AdminCommands::Products { search } => {
            require_session(&session)?;
            let products = ctx.backend()?.list_products().await?;
            let scope = SearchScope::Admin;
            let matches = scope.filter(&products, search.as_deref().unwrap_or_default());
            print_products(&matches, scope);
            println!("{} de {} produtos", matches.len(), products.len());
        }
        AdminCommands::Create { fields, images } => {
            require_session(&session)?;
            let mut draft = fields.apply(ProductDraft::default())?;
            if !images.is_empty() {
                draft.images = Some(images);
            }
            let product = ctx.backend()?.create_product(draft).await?;
            println!("Produto {} criado: {}", product.id, product.name);
        }
        AdminCommands::Update { id, fields } => {
            require_session(&session)?;
            let backend = ctx.backend()?;
            let existing = backend
                .get_product(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("product {id} not found"))?;
            let draft = fields.apply(ProductDraft::from_product(&existing))?;
            let product = backend.update_product(id, draft).await?;
            println!("Produto {} atualizado: {}", product.id, product.name);
        }
        AdminCommands::Delete { id, yes } => {
            require_session(&session)?;
            if !yes {
                anyhow::bail!("refusing to delete product {id} without --yes");
            }
            ctx.backend()?.delete_product(id).await?;
            println!("Produto {id} excluído.");
        }
    }
    Ok(())
}
