//! In-memory catalog of indexed items, resolving routes to items and files.

use std::collections::HashMap;

use futures::StreamExt;
use tracing::{error, info};

use crate::error::{IndexError, Result};
use crate::event::ItemStream;
use crate::files::File;
use crate::item::Item;
use crate::route::Route;

#[derive(Debug, Default)]
pub struct ItemIndex {
    items: Vec<Item>,
    by_route: HashMap<Route, usize>,
    files_by_route: HashMap<Route, (usize, usize)>,
}

impl ItemIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains `stream` into a new index. Error events are logged and
    /// returned alongside; they never stop the drain.
    pub async fn from_stream(mut stream: ItemStream) -> (Self, Vec<IndexError>) {
        let mut index = Self::new();
        let mut errors = Vec::new();

        while let Some(event) = stream.next().await {
            match event.into_result() {
                Ok(item) => index.insert(item),
                Err(e) => {
                    error!(error = %e, "Skipping item that failed to index");
                    errors.push(e);
                }
            }
        }

        info!(
            items = index.len(),
            errors = errors.len(),
            "Item index built"
        );
        (index, errors)
    }

    /// Adds `item`, replacing any item already stored under the same route.
    pub fn insert(&mut self, item: Item) {
        let route = item.route().clone();
        let position = match self.by_route.get(&route) {
            Some(&position) => {
                self.files_by_route
                    .retain(|_, (item_position, _)| *item_position != position);
                self.items[position] = item;
                position
            }
            None => {
                self.items.push(item);
                self.items.len() - 1
            }
        };

        for (file_position, file) in self.items[position].files().iter().enumerate() {
            self.files_by_route
                .entry(file.route().clone())
                .or_insert((position, file_position));
        }
        self.by_route.insert(route, position);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order; for an index built from a stream that is
    /// walk order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn is_match(&self, route: &Route) -> Option<&Item> {
        self.by_route.get(route).map(|&position| &self.items[position])
    }

    /// Looks `route` up among the files of all items. The first item to
    /// claim a file route wins.
    pub fn is_file_match(&self, route: &Route) -> Option<&File> {
        self.files_by_route
            .get(route)
            .map(|&(item, file)| &self.items[item].files()[file])
    }

    /// Items directly below `route`.
    pub fn children(&self, route: &Route) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| {
                item.route().is_child_of(route)
                    && item.route().segments().len() == route.segments().len() + 1
            })
            .collect()
    }

    /// Content of the item at `route`, else of the file at `route`.
    pub async fn read(&self, route: &Route) -> Option<Result<Vec<u8>>> {
        let provider = match self.is_match(route) {
            Some(item) => item.content_provider(),
            None => self.is_file_match(route)?.content_provider(),
        };
        Some(provider.data().await)
    }
}
