use stepwise_core::registry::topo_order;

use crate::workspace::Workspace;

/// `stepwise validate`
pub fn validate(ws: &Workspace) -> anyhow::Result<()> {
    let registry = ws.registry()?;
    let issues = registry.validate();
    if issues.is_empty() {
        println!("{} tutorials OK", registry.entries.len());
        return Ok(());
    }
    for issue in &issues {
        println!("error: {issue}");
    }
    anyhow::bail!("{} issue(s) in {}", issues.len(), ws.tutorials_dir.display());
}

/// `stepwise order`
pub fn order(ws: &Workspace) -> anyhow::Result<()> {
    let registry = ws.registry()?;
    let order = topo_order(&registry.tutorials())?;
    for (i, slug) in order.iter().enumerate() {
        println!("{:>3}. {slug}", i + 1);
    }
    Ok(())
}
