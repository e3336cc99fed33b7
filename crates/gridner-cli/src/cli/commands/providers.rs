//! Provider registry management commands.

use std::collections::BTreeMap;

use console::style;

use gridner::config::Settings;
use gridner_services::{ProviderDescriptor, ProviderRegistry};

fn load_registry(settings: &Settings) -> anyhow::Result<ProviderRegistry> {
    settings.ensure_directories()?;
    Ok(ProviderRegistry::load(&settings.providers_path())?)
}

/// List registered providers.
pub async fn cmd_providers_list(settings: &Settings) -> anyhow::Result<()> {
    let registry = load_registry(settings)?;

    if registry.is_empty() {
        println!("{} No providers registered", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Extraction Providers").bold());
    println!("{}", "-".repeat(60));
    println!("{:<20} {:<15} {}", "Name", "Class", "Configured");
    println!("{}", "-".repeat(60));

    for descriptor in registry.serialize() {
        let configured = if descriptor.configured {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "{:<20} {:<15} {}",
            descriptor.name, descriptor.kind, configured
        );
        print_settings("settings", &descriptor.settings);
        print_settings("defaults", &descriptor.extraction_settings);
        if !descriptor.documentation.is_empty() {
            println!("  {} {}", style("docs").dim(), descriptor.documentation);
        }
    }

    println!(
        "\n{} Providers file: {}",
        style("→").cyan(),
        settings.providers_path().display()
    );
    Ok(())
}

fn print_settings(label: &str, values: &BTreeMap<String, String>) {
    for (key, value) in values {
        let shown = if value.is_empty() {
            style("(unset)".to_string()).dim().to_string()
        } else {
            value.clone()
        };
        println!("  {} {} = {}", style(label).dim(), key, shown);
    }
}

/// Register a provider of a known class.
pub async fn cmd_providers_add(settings: &Settings, name: &str, class: &str) -> anyhow::Result<()> {
    let mut registry = load_registry(settings)?;

    if registry.contains(name) {
        println!("{} Provider '{}' already exists", style("!").yellow(), name);
        return Ok(());
    }

    let provider = registry.get_or_create(name, class)?;
    let descriptor = ProviderDescriptor::describe(name, provider);
    registry.save()?;

    println!(
        "{} Added provider '{}' ({})",
        style("✓").green(),
        name,
        descriptor.kind
    );
    for key in descriptor.settings.keys() {
        println!(
            "  {} gridner providers set {} '{}' <value>",
            style("→").cyan(),
            name,
            key
        );
    }
    Ok(())
}

/// Set a service setting, or an extraction default when the provider has no
/// service setting with that key.
pub async fn cmd_providers_set(
    settings: &Settings,
    name: &str,
    key: &str,
    value: &str,
) -> anyhow::Result<()> {
    let mut registry = load_registry(settings)?;
    let values = BTreeMap::from([(key.to_string(), value.to_string())]);

    let target = if registry.update_settings(name, &values)? > 0 {
        "setting"
    } else if registry.update_extraction_defaults(name, &values)? > 0 {
        "extraction default"
    } else {
        println!(
            "{} Provider '{}' has no setting '{}'",
            style("✗").red(),
            name,
            key
        );
        return Ok(());
    };

    registry.save()?;
    println!(
        "{} Updated {} '{}' of '{}'",
        style("✓").green(),
        target,
        key,
        name
    );
    if !registry.get(name)?.is_configured() {
        println!(
            "{} Provider '{}' is still missing required settings",
            style("!").yellow(),
            name
        );
    }
    Ok(())
}
