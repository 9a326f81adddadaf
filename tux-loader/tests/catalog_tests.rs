// ABOUTME: Tests for the CogCatalog factory registry
// ABOUTME: Validates lookup by kind, config passing and unknown-kind errors

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tux_core::{Cog, RuntimeHandle};
use tux_loader::testing::{test_catalog, StaticCog};
use tux_loader::CogCatalog;

#[derive(Default)]
struct Plain;

#[async_trait]
impl Cog for Plain {
    fn name(&self) -> &str {
        "plain"
    }

    async fn setup(&self, _runtime: &mut RuntimeHandle<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn test_catalog_creates_registered_kind() {
    let catalog = CogCatalog::new().register_default::<Plain>("plain");
    let cog = catalog.create("plain", &json!({})).unwrap();
    assert_eq!(cog.name(), "plain");
}

#[test]
fn test_catalog_lists_available_kinds_sorted() {
    let catalog = CogCatalog::new()
        .register_default::<Plain>("zeta")
        .register_default::<Plain>("alpha");
    assert_eq!(catalog.available(), vec!["alpha", "zeta"]);
    assert!(catalog.contains("alpha"));
    assert!(!catalog.contains("beta"));
}

#[test]
fn test_catalog_unknown_kind_errors() {
    let catalog = CogCatalog::new();
    match catalog.create("nonexistent", &json!({})) {
        Err(err) => assert!(err.to_string().contains("Unknown cog kind: nonexistent")),
        Ok(_) => panic!("Expected error for unknown kind"),
    }
}

#[test]
fn test_catalog_passes_config_to_factory() {
    let catalog = test_catalog();
    assert!(catalog
        .create("static", &json!({"commands": ["a", "b"]}))
        .is_ok());

    let err = catalog
        .create("static", &json!({"comands": ["a"]}))
        .err()
        .unwrap();
    assert!(format!("{:#}", err).contains("Invalid static cog config"));
}

#[test]
fn test_catalog_custom_factory_closure() {
    let catalog = CogCatalog::new().register("custom", |config| {
        let commands: Vec<String> = serde_json::from_value(config["names"].clone())?;
        let mut cog = StaticCog::new();
        for name in &commands {
            cog = cog.command(name);
        }
        Ok(Arc::new(cog) as Arc<dyn Cog>)
    });
    assert!(catalog.create("custom", &json!({"names": ["x"]})).is_ok());
    assert!(catalog.create("custom", &json!({})).is_err());
}

#[test]
fn test_catalog_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CogCatalog>();
}
