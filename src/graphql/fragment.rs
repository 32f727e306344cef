//! Transitive closure of the fragments a selection set spreads
use super::Pos;
use graphql_parser::query::{Definition, Document, FragmentDefinition, Selection, SelectionSet};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("field aliases are not supported (`{alias}: {field}`)")]
    UnsupportedAlias {
        field: String,
        alias: String,
        position: Pos,
    },
    #[error("unknown fragment `{name}`")]
    UnknownFragment { name: String, position: Pos },
}

impl Error {
    pub fn position(&self) -> Pos {
        match self {
            Error::UnsupportedAlias { position, .. } | Error::UnknownFragment { position, .. } => {
                *position
            }
        }
    }
}

type Definitions<'d, 'a> = HashMap<&'d str, &'d FragmentDefinition<'a, String>>;
type Collected<'d, 'a> = IndexMap<&'d str, &'d FragmentDefinition<'a, String>>;

/// Every fragment reachable from `selection_set` through spreads, including
/// spreads inside inline fragments and inside other fragments. Each fragment
/// appears once, in the order it is first reached.
pub fn collect_fragments<'d, 'a>(
    document: &'d Document<'a, String>,
    selection_set: &'d SelectionSet<'a, String>,
) -> Result<Vec<&'d FragmentDefinition<'a, String>>, Error> {
    let definitions = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
            Definition::Operation(_) => None,
        })
        .collect::<Definitions>();
    let mut collected = Collected::new();
    walk(&definitions, selection_set, &mut collected)?;
    Ok(collected.into_values().collect())
}

fn walk<'d, 'a>(
    definitions: &Definitions<'d, 'a>,
    selection_set: &'d SelectionSet<'a, String>,
    collected: &mut Collected<'d, 'a>,
) -> Result<(), Error> {
    for selection in &selection_set.items {
        match selection {
            Selection::Field(field) => {
                if let Some(alias) = &field.alias {
                    return Err(Error::UnsupportedAlias {
                        field: field.name.clone(),
                        alias: alias.clone(),
                        position: field.position,
                    });
                }
                walk(definitions, &field.selection_set, collected)?;
            }
            Selection::InlineFragment(inline) => {
                walk(definitions, &inline.selection_set, collected)?;
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if collected.contains_key(name) {
                    continue;
                }
                let fragment = definitions
                    .get(name)
                    .copied()
                    .ok_or_else(|| Error::UnknownFragment {
                        name: name.to_string(),
                        position: spread.position,
                    })?;
                collected.insert(name, fragment);
                walk(definitions, &fragment.selection_set, collected)?;
            }
        }
    }
    Ok(())
}
