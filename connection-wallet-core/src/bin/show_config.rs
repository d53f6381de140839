use anyhow::Context;
use connection_wallet_core::init;
use connection_wallet_core::shared::{types::Address, utils::checksum_address};

fn main() -> anyhow::Result<()> {
    let config = init().context("failed to load configuration")?;
    let registry = config.build_registry().context("failed to build network registry")?;

    println!("Connection Wallet Core Configuration:\n");
    println!("  Default Network: {}", config.default_network);
    println!("  Deployments File: {}", config.deployments_file.display());
    println!("  Registration Fee: {}", config.registration_fee);
    println!("  Log Level: {}", config.log_level);
    println!(
        "  Dev Node: {}",
        config.dev_node_url().unwrap_or_else(|| "(not set)".to_string())
    );
    println!(
        "  Faucet Key: {}",
        if config.faucet_private_key.is_some() { "(set)" } else { "(not set)" }
    );

    println!("\nNetworks:");
    for network in registry.descriptors() {
        let marker = if network.key == registry.default_key() { "*" } else { " " };
        println!(
            " {} {} ({}, chain {} / {})",
            marker,
            network.display_name,
            network.key,
            network.chain_id,
            network.chain_id_hex()
        );
        println!("      RPC URL: {}", network.rpc_url);

        let addresses = config.deployments.get(&network.key).cloned().unwrap_or_default();
        let show = |address: Option<Address>| {
            address
                .map(|a| checksum_address(&a))
                .unwrap_or_else(|| "(not set)".to_string())
        };
        println!("      Registry: {}", show(addresses.registry_address));
        println!("      Token: {}", show(addresses.token_address));
    }

    Ok(())
}
