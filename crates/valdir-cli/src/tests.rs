use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["valdir-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_locate_with_defaults() {
    let cli = Cli::try_parse_from(["valdir-cli", "locate", "88310-002"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Locate {
            ref postal_code,
            store: None,
            anyway: false,
            dry_run: false,
        }) if postal_code == "88310-002"
    ));
}

#[test]
fn parses_locate_with_store_override_and_anyway() {
    let cli = Cli::try_parse_from([
        "valdir-cli",
        "locate",
        "01310100",
        "--store",
        "sao-vicente",
        "--anyway",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Locate {
            store: Some(ref s),
            anyway: true,
            dry_run: true,
            ..
        }) if s == "sao-vicente"
    ));
}

#[test]
fn locate_requires_postal_code() {
    assert!(Cli::try_parse_from(["valdir-cli", "locate"]).is_err());
}

#[test]
fn parses_store_switch() {
    let cli = Cli::try_parse_from(["valdir-cli", "store", "switch", "cordeiros"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            command: StoreCommands::Switch { ref store }
        }) if store == "cordeiros"
    ));
}

#[test]
fn parses_store_clear() {
    let cli = Cli::try_parse_from(["valdir-cli", "store", "clear"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            command: StoreCommands::Clear
        })
    ));
}

#[test]
fn parses_catalog_list_with_category() {
    let cli = Cli::try_parse_from(["valdir-cli", "catalog", "list", "--category", "sofa"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::List {
                search: None,
                category: Some(ref c),
            }
        }) if c == "sofa"
    ));
}

#[test]
fn catalog_accepts_search_with_category() {
    let cli = Cli::try_parse_from([
        "valdir-cli",
        "catalog",
        "list",
        "--search",
        "mesa",
        "--category",
        "sofa",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::List {
                search: Some(ref s),
                category: Some(ref c),
            }
        }) if s == "mesa" && c == "sofa"
    ));
}

#[test]
fn parses_catalog_interest() {
    let cli = Cli::try_parse_from(["valdir-cli", "catalog", "interest", "42"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::Interest { id: 42 }
        })
    ));
}

#[test]
fn parses_admin_login() {
    let cli = Cli::try_parse_from([
        "valdir-cli",
        "admin",
        "login",
        "--email",
        "admin@valdir.com.br",
        "--password",
        "s3nha",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Admin {
            command: AdminCommands::Login { ref email, ref password }
        }) if email == "admin@valdir.com.br" && password == "s3nha"
    ));
}

#[test]
fn parses_admin_create_with_images() {
    let cli = Cli::try_parse_from([
        "valdir-cli",
        "admin",
        "create",
        "--name",
        "Mesa",
        "--price",
        "899,90",
        "--image",
        "https://cdn.example/a.jpg",
        "--image",
        "https://cdn.example/b.jpg",
    ])
    .unwrap();
    let Some(Commands::Admin {
        command: AdminCommands::Create { fields, images },
    }) = cli.command
    else {
        panic!("expected admin create");
    };
    assert_eq!(fields.name.as_deref(), Some("Mesa"));
    assert_eq!(fields.price.as_deref(), Some("899,90"));
    assert_eq!(images.len(), 2);
}

#[test]
fn parses_admin_update_with_cleared_field() {
    let cli = Cli::try_parse_from([
        "valdir-cli",
        "admin",
        "update",
        "7",
        "--sale-price",
        "",
    ])
    .unwrap();
    let Some(Commands::Admin {
        command: AdminCommands::Update { id, fields },
    }) = cli.command
    else {
        panic!("expected admin update");
    };
    assert_eq!(id, 7);
    assert_eq!(fields.sale_price.as_deref(), Some(""));
    assert!(fields.name.is_none());
}

#[test]
fn parses_admin_delete_confirmation_flag() {
    let cli = Cli::try_parse_from(["valdir-cli", "admin", "delete", "5", "--yes"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Admin {
            command: AdminCommands::Delete { id: 5, yes: true }
        })
    ));
}
