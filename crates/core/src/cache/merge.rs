//! Pure halves of the detail merge cache: splitting a request into store
//! hits and a residual origin request, then reassembling the response.

use std::collections::HashMap;

use crate::model::{DiResponse, IdsWithType};
use crate::registry::{DetailItem, ResourceKind};

use super::keys::detail_key;

/// Store hits of a detail request and what is left to fetch.
#[derive(Debug, Default)]
pub struct DetailHits {
    /// Decoded hits keyed by `(type code, id)`.
    pub found: HashMap<(i32, String), DetailItem>,
    /// Missing ids grouped by type, in request order.
    pub residual: Vec<IdsWithType>,
    /// Keys whose stored blob failed to decode. They count as misses.
    pub corrupt: Vec<String>,
}

impl DetailHits {
    /// Every requested id counts as a miss.
    pub fn all_missing(requested: &[IdsWithType]) -> Self {
        Self {
            residual: requested
                .iter()
                .filter(|idt| !idt.ids.is_empty())
                .cloned()
                .collect(),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.residual.is_empty()
    }
}

/// Store keys for every `(type, id)` of the request, flattened in order.
pub fn request_keys(requested: &[IdsWithType], version_of: impl Fn(i32) -> u32) -> Vec<String> {
    requested
        .iter()
        .flat_map(|idt| {
            let version = version_of(idt.r#type);
            idt.ids
                .iter()
                .map(move |id| detail_key(idt.r#type, version, id))
        })
        .collect()
}

/// Splits the store answer for [`request_keys`] into hits and misses.
///
/// `blobs` must be aligned with the flattened request. Ids of an unknown
/// type and blobs that fail to decode are misses.
pub fn partition_hits(
    requested: &[IdsWithType],
    keys: &[String],
    blobs: Vec<Option<Vec<u8>>>,
) -> DetailHits {
    let mut hits = DetailHits::default();
    let mut slots = keys.iter().zip(blobs);

    for idt in requested {
        let kind = ResourceKind::from_code(idt.r#type);
        let mut missing = Vec::new();

        for id in &idt.ids {
            let Some((key, blob)) = slots.next() else {
                missing.push(id.clone());
                continue;
            };
            let decoded = match (kind, blob) {
                (Some(kind), Some(blob)) => match DetailItem::unpack(kind, &blob) {
                    Ok(item) => Some(item),
                    Err(_) => {
                        hits.corrupt.push(key.clone());
                        None
                    }
                },
                _ => None,
            };
            match decoded {
                Some(item) => {
                    hits.found.insert((idt.r#type, id.clone()), item);
                }
                None => missing.push(id.clone()),
            }
        }

        if !missing.is_empty() {
            hits.residual.push(IdsWithType::new(idt.r#type, missing));
        }
    }

    hits
}

/// Reassembles a response in the requested id order.
///
/// Each id is taken from the store hits first and from `fresh` second. Ids
/// resolved by neither are dropped. Types requested more than once appear
/// once in `type_list`.
pub fn merge_details(
    requested: &[IdsWithType],
    found: &HashMap<(i32, String), DetailItem>,
    fresh: Option<&DiResponse>,
) -> DiResponse {
    let mut fresh_map: HashMap<(i32, String), DetailItem> = HashMap::new();
    if let Some(fresh) = fresh {
        for kind in ResourceKind::ALL {
            for item in fresh.items(*kind) {
                fresh_map.insert((kind.code(), item.id()), item);
            }
        }
    }

    let mut type_list: Vec<i32> = Vec::new();
    for idt in requested {
        if !type_list.contains(&idt.r#type) {
            type_list.push(idt.r#type);
        }
    }

    let mut merged = DiResponse::with_types(type_list);
    for idt in requested {
        for id in &idt.ids {
            let slot = (idt.r#type, id.clone());
            if let Some(item) = found.get(&slot).or_else(|| fresh_map.get(&slot)) {
                merged.push(item.clone());
            }
        }
    }
    merged
}

/// Ids of the response, per type, in response order.
pub fn response_ids(response: &DiResponse) -> Vec<(i32, String)> {
    ResourceKind::ALL
        .iter()
        .flat_map(|kind| {
            response
                .items(*kind)
                .into_iter()
                .map(|item| (kind.code(), item.id()))
        })
        .collect()
}
