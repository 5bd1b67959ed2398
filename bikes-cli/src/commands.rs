use bikes_catalog::{Component, Item, ItemKind};
use bikes_store::CatalogSession;
use serde::Serialize;

use crate::{Commands, OutputFormat};

/// JSON view of an item with its derived cost
#[derive(Serialize)]
struct ItemView<'a> {
    id: &'a str,
    name: &'a str,
    kind: ItemKind,
    cost: i64,
    components: &'a [Component],
}

fn view<'a>(session: &CatalogSession, item: &'a Item) -> anyhow::Result<ItemView<'a>> {
    Ok(ItemView {
        id: item.id(),
        name: item.name(),
        kind: item.kind(),
        cost: session.cost(item.id())?,
        components: item.components().unwrap_or(&[]),
    })
}

pub fn run(session: &mut CatalogSession, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List { format } => match format {
            OutputFormat::Text => {
                for line in session.display_strings()? {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => {
                let session = &*session;
                let views = session
                    .products()
                    .iter()
                    .map(|item| view(session, item))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                println!("{}", serde_json::to_string_pretty(&views)?);
            }
        },
        Commands::Show { id } => {
            let item = session.get(&id)?;
            println!("{}", item.display_line(session.products())?);
        }
        Commands::Cost { id } => {
            println!("{}", session.cost(&id)?);
        }
        Commands::Deps { id } => {
            for dep in session.products().dependencies(&id)? {
                println!("{}", dep);
            }
        }
        Commands::UsedBy { id } => {
            for user in session.products().referenced_by(&id) {
                println!("{}", user);
            }
        }
        Commands::AddPart { id, name, cost } => {
            session.add_part(&id)?;
            if let Some(name) = name {
                session.set_name(&id, &name)?;
            }
            if let Some(cost) = cost {
                session.set_cost(&id, cost)?;
            }
        }
        Commands::AddCompound { id, name, components } => {
            session.add_compound(&id)?;
            if let Some(name) = name {
                session.set_name(&id, &name)?;
            }
            if let Some(spec) = components {
                session.set_components(&id, &spec)?;
            }
        }
        Commands::Rename { id, name } => session.set_name(&id, &name)?,
        Commands::SetCost { id, cost } => session.set_cost(&id, cost)?,
        Commands::SetComponents { id, spec } => session.set_components(&id, &spec)?,
        Commands::Remove { id } => {
            session.remove(&id)?;
        }
    }
    Ok(())
}
