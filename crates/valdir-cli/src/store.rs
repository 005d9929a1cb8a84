//! Store selection commands: the locator flow and the persisted choice.

use std::sync::Arc;

use clap::Subcommand;
use valdir_core::{should_prompt_for_store, SelectedStoreState, SessionState, Store};
use valdir_locator::{FlowState, LocatorFlow, SelectionBasis, StoreSuggestion};

use crate::Context;

#[derive(Debug, Subcommand)]
pub enum StoreCommands {
    /// Show the selected store
    Show,
    /// List both stores
    List,
    /// Switch the selected store without entering a postal code
    Switch {
        /// Store id, e.g. cordeiros
        store: String,
    },
    /// Select the default store without entering a postal code
    Default,
    /// Forget the selected store
    Clear,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LocateOptions<'a> {
    pub store: Option<&'a str>,
    pub anyway: bool,
    pub dry_run: bool,
}

fn describe(store: &Store) -> String {
    format!("{} ({}) - {}", store.name, store.id, store.address)
}

fn describe_basis(basis: &SelectionBasis) -> String {
    match basis {
        SelectionBasis::Distance { km } => format!("a {km:.1} km"),
        SelectionBasis::PostalPrefix { prefix } => {
            format!("aproximada pelo prefixo do CEP {prefix:05}")
        }
        SelectionBasis::Default => "localização indisponível, loja padrão".to_string(),
    }
}

fn print_suggestion(suggestion: &StoreSuggestion) {
    let address = &suggestion.address;
    println!(
        "CEP {}: {}, {} - {}/{}",
        suggestion.postal_code, address.street, address.neighborhood, address.locality, address.region
    );
    println!(
        "Loja sugerida: {} [{}]",
        describe(&suggestion.store),
        describe_basis(&suggestion.basis)
    );
}

/// Runs the locator flow for one postal code and persists the result unless
/// `dry_run` is set.
///
/// # Errors
///
/// Returns an error if the code is rejected, the area is not served and
/// `anyway` is not set, or the selection cannot be stored.
pub(crate) async fn run_locate(
    ctx: &Context,
    postal_code: &str,
    options: LocateOptions<'_>,
) -> anyhow::Result<()> {
    let locator = ctx.locator()?;
    let mut flow = LocatorFlow::new(&locator, SelectedStoreState::new(Arc::clone(&ctx.storage)));

    if let FlowState::AwaitingConfirmation { candidate, .. } = flow.open()? {
        tracing::debug!(current = %candidate.id, "replacing the selected store");
        flow.change_postal_code()?;
    }

    match flow.submit_postal_code(postal_code).await? {
        FlowState::AwaitingConfirmation {
            suggestion: Some(suggestion),
            ..
        } => print_suggestion(suggestion),
        FlowState::AreaNotServed { address } => {
            println!("Ainda não atendemos {}/{}.", address.locality, address.region);
            if !options.anyway {
                anyhow::bail!(
                    "area not served; rerun with --anyway to use {}",
                    ctx.data.default_store().name
                );
            }
            if options.dry_run {
                println!("Loja padrão: {}", describe(ctx.data.default_store()));
                return Ok(());
            }
            if let FlowState::Persisted { store } = flow.continue_anyway()? {
                println!("Loja selecionada: {}", describe(store));
            }
            return Ok(());
        }
        _ => {
            let reason = flow
                .last_error()
                .map_or_else(|| "postal code rejected".to_string(), ToString::to_string);
            anyhow::bail!(reason);
        }
    }

    if let Some(store_id) = options.store {
        flow.choose_store(store_id)?;
    }

    if options.dry_run {
        if let FlowState::AwaitingConfirmation { candidate, .. } = flow.state() {
            println!("Loja escolhida (não salva): {}", describe(candidate));
        }
        return Ok(());
    }

    if let FlowState::Persisted { store } = flow.confirm()? {
        println!("Loja selecionada: {}", describe(store));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if client storage cannot be read or written, or the
/// requested store does not exist.
pub(crate) fn run(ctx: &Context, command: StoreCommands) -> anyhow::Result<()> {
    let selection = SelectedStoreState::new(Arc::clone(&ctx.storage));
    match command {
        StoreCommands::Show => {
            let selected = selection.read()?;
            let admin = SessionState::new(Arc::clone(&ctx.storage)).read()?.is_some();
            match &selected {
                Some(store) => {
                    println!("Loja selecionada: {}", describe(store));
                    println!("Contato: https://wa.me/{}", store.contact_handle);
                }
                None => println!("Nenhuma loja selecionada."),
            }
            if should_prompt_for_store(selected.is_some(), false, admin) {
                println!("Execute `valdir-cli locate <CEP>` para escolher a loja mais próxima.");
            }
        }
        StoreCommands::List => {
            let default_id = &ctx.data.default_store().id;
            println!("{:<14}{:<14}{:<16}ENDEREÇO", "ID", "LOJA", "CEP");
            for store in ctx.data.stores() {
                let marker = if &store.id == default_id { " (padrão)" } else { "" };
                println!(
                    "{:<14}{:<14}{:<16}{}{marker}",
                    store.id, store.name, store.postal_code, store.address
                );
            }
        }
        StoreCommands::Switch { store } => {
            let locator = ctx.locator()?;
            let mut flow = LocatorFlow::new(&locator, selection);
            if !matches!(flow.open()?, FlowState::AwaitingConfirmation { .. }) {
                anyhow::bail!(
                    "no store selected yet; run `valdir-cli locate <CEP>` or `valdir-cli store default`"
                );
            }
            flow.choose_store(&store)?;
            if let FlowState::Persisted { store } = flow.confirm()? {
                println!("Loja selecionada: {}", describe(store));
            }
        }
        StoreCommands::Default => {
            let locator = ctx.locator()?;
            let mut flow = LocatorFlow::new(&locator, selection);
            if let FlowState::AwaitingConfirmation { .. } = flow.open()? {
                flow.change_postal_code()?;
            }
            if let FlowState::Persisted { store } = flow.continue_anyway()? {
                println!("Loja selecionada: {}", describe(store));
            }
        }
        StoreCommands::Clear => {
            selection.clear()?;
            println!("Seleção de loja removida.");
        }
    }
    Ok(())
}
