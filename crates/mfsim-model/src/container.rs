//! Named collection of value items forming one job settings document.
//!
//! A [`ValueItemContainer`] owns its items by name, keeps their vertical
//! order and relays every item change to its own receivers. Items that are
//! flagged as update notifiers can ask an external [`UpdateNotifier`] to
//! refresh dependent items after a value change.

use std::cell::{Ref, RefCell};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::{debug, info, warn};

use crate::change::{ChangeEvent, ChangeKind, ChangeNotifier, ChangeReceiver, ForwardingReceiver};
use crate::enums::ValueItemStatus;
use crate::error::{ModelError, Result};
use crate::options::ModelOptions;
use crate::value_item::{VALUE_ITEM, ValueItem};
use crate::xml::{XmlElement, parse_xml};

const VALUE_ITEM_CONTAINER: &str = "ValueItemContainer";

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a container; value items record the container they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
    fn next() -> Self {
        Self(NEXT_CONTAINER_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Refreshes items that depend on the value of an update-notifier item.
pub trait UpdateNotifier {
    fn notify_dependent_value_items_for_update(&self, container: &mut ValueItemContainer, item_name: &str);
}

fn by_vertical_position(a: &ValueItem, b: &ValueItem) -> Ordering {
    a.vertical_position()
        .cmp(&b.vertical_position())
        .then_with(|| a.name().cmp(b.name()))
}

fn cached<'a>(cache: &'a RefCell<Option<Vec<String>>>, build: impl FnOnce() -> Vec<String>) -> Ref<'a, [String]> {
    if cache.borrow().is_none() {
        *cache.borrow_mut() = Some(build());
    }
    Ref::map(cache.borrow(), |names| names.as_deref().unwrap_or_default())
}

/// Value items keyed by unique name.
pub struct ValueItemContainer {
    id: ContainerId,
    options: ModelOptions,
    items: HashMap<String, ValueItem>,
    value_item_names: RefCell<Option<Vec<String>>>,
    sorted_value_item_names: RefCell<Option<Vec<String>>>,
    notifier: Rc<ChangeNotifier>,
    forwarder: Rc<dyn ChangeReceiver>,
    update_notifier: Option<Rc<dyn UpdateNotifier>>,
    update_depth: usize,
}

impl Default for ValueItemContainer {
    fn default() -> Self {
        Self::with_options(ModelOptions::default())
    }
}

impl ValueItemContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ModelOptions) -> Self {
        let notifier = Rc::new(ChangeNotifier::new(options.max_notification_depth));
        let forwarder: Rc<dyn ChangeReceiver> = Rc::new(ForwardingReceiver::new(&notifier));
        Self {
            id: ContainerId::next(),
            options,
            items: HashMap::new(),
            value_item_names: RefCell::new(None),
            sorted_value_item_names: RefCell::new(None),
            notifier,
            forwarder,
            update_notifier: None,
            update_depth: 0,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn options(&self) -> ModelOptions {
        self.options
    }

    pub fn set_update_notifier(&mut self, update_notifier: Rc<dyn UpdateNotifier>) {
        self.update_notifier = Some(update_notifier);
    }

    pub fn remove_update_notifier(&mut self) {
        self.update_notifier = None;
    }

    /// Removes all items; the update notifier and container receivers stay.
    pub fn clear(&mut self) {
        for item in self.items.values_mut() {
            Self::release(item, &self.forwarder);
        }
        self.items.clear();
        self.invalidate_caches();
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn invalidate_caches(&self) {
        self.value_item_names.replace(None);
        self.sorted_value_item_names.replace(None);
    }

    fn release(item: &mut ValueItem, forwarder: &Rc<dyn ChangeReceiver>) {
        item.unbind_container();
        if let Err(error) = item.remove_single_change_receiver(forwarder) {
            warn!(item = %item.name(), %error, "Cannot detach value item from container");
        }
    }

    fn notify(&self, kind: ChangeKind, info: Option<String>) {
        self.notifier.notify(&ChangeEvent::container(kind, info));
    }

    // =========================================================================
    // CHANGE RECEIVERS
    // =========================================================================

    /// Receivers of container events and of forwarded item events.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn add_single_change_receiver_to_value_items(&self, receiver: &Rc<dyn ChangeReceiver>) -> Result<()> {
        for item in self.items.values() {
            item.add_change_receiver(Rc::clone(receiver))?;
        }
        Ok(())
    }

    pub fn remove_single_change_receiver_of_value_items(&self, receiver: &Rc<dyn ChangeReceiver>) -> Result<()> {
        for item in self.items.values() {
            item.remove_single_change_receiver(receiver)?;
        }
        Ok(())
    }

    /// Removes every item receiver except the container's own forwarding.
    pub fn remove_all_change_receivers_of_value_items(&self) -> Result<()> {
        for item in self.items.values() {
            item.remove_all_change_receivers()?;
            item.add_change_receiver(Rc::clone(&self.forwarder))?;
        }
        Ok(())
    }

    // =========================================================================
    // MEMBERSHIP
    // =========================================================================

    /// Adds an item without announcing it.
    ///
    /// Fails for empty and duplicate names. The item is bound to this
    /// container and forwards its events to the container's receivers.
    pub fn add_value_item(&mut self, mut item: ValueItem) -> Result<()> {
        if item.name().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.items.contains_key(item.name()) {
            return Err(ModelError::DuplicateName {
                name: item.name().to_string(),
            });
        }
        item.add_change_receiver(Rc::clone(&self.forwarder))?;
        item.bind_container(self.id);
        self.items.insert(item.name().to_string(), item);
        self.invalidate_caches();
        Ok(())
    }

    /// Adds all items or none.
    ///
    /// Announces a number change carrying the block name of the first item
    /// unless `is_notification_suppressed` is set.
    pub fn add_value_items(&mut self, items: Vec<ValueItem>, is_notification_suppressed: bool) -> Result<()> {
        let Some(first_block) = items.first().map(|item| item.block_name().to_string()) else {
            return Ok(());
        };
        self.check_new_names(&items)?;
        for item in items {
            self.add_value_item(item)?;
        }
        if !is_notification_suppressed {
            self.notify(ChangeKind::ContainerNumberChange, Some(first_block));
        }
        Ok(())
    }

    /// Adds all items or none, then renumbers the blocks.
    pub fn add_value_items_and_sort_blocks(&mut self, items: Vec<ValueItem>, is_notification_suppressed: bool) -> Result<()> {
        let Some(first_block) = items.first().map(|item| item.block_name().to_string()) else {
            return Ok(());
        };
        self.add_value_items(items, true)?;
        self.sort_blocks(true);
        if !is_notification_suppressed {
            self.notify(ChangeKind::ContainerNumberChange, Some(first_block));
        }
        Ok(())
    }

    fn check_new_names(&self, items: &[ValueItem]) -> Result<()> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if item.name().is_empty() {
                return Err(ModelError::EmptyName);
            }
            if self.items.contains_key(item.name()) || !seen.insert(item.name()) {
                return Err(ModelError::DuplicateName {
                    name: item.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Takes an item out of the container without announcing it.
    pub fn remove_value_item(&mut self, name: &str) -> Option<ValueItem> {
        let mut item = self.items.remove(name)?;
        Self::release(&mut item, &self.forwarder);
        self.invalidate_caches();
        Some(item)
    }

    /// Replaces the item of the same name; returns false if there is none.
    pub fn replace_value_item(&mut self, item: ValueItem) -> Result<bool> {
        if self.remove_value_item(item.name()).is_none() {
            return Ok(false);
        }
        self.add_value_item(item)?;
        Ok(true)
    }

    /// Like [`replace_value_item`](Self::replace_value_item), keeping the
    /// vertical position and node names of the replaced item.
    pub fn replace_value_item_with_kept_vertical_position_and_node_names(&mut self, mut item: ValueItem) -> Result<bool> {
        let Some(replaced) = self.remove_value_item(item.name()) else {
            return Ok(false);
        };
        item.set_vertical_position(replaced.vertical_position());
        item.set_node_names(replaced.node_names().to_vec());
        self.add_value_item(item)?;
        Ok(true)
    }

    /// Inserts `item` at the vertical position of `anchor`.
    ///
    /// The anchor and every item sorted after it move down by one. Returns
    /// false if `anchor` does not exist.
    pub fn insert_value_item_before(&mut self, mut item: ValueItem, anchor: &str) -> Result<bool> {
        let Some(position) = self.items.get(anchor).map(ValueItem::vertical_position) else {
            return Ok(false);
        };
        self.check_new_names(std::slice::from_ref(&item))?;
        let sorted = self.sorted_names();
        let start = sorted.iter().position(|name| name == anchor).unwrap_or(sorted.len());
        for name in &sorted[start..] {
            if let Some(shifted) = self.items.get_mut(name) {
                shifted.increment_vertical_position();
            }
        }
        item.set_vertical_position(position);
        self.add_value_item(item)?;
        Ok(true)
    }

    /// Removes the items of a block and announces a number change.
    pub fn remove_value_items_of_block(&mut self, block_name: &str) -> Vec<ValueItem> {
        if block_name.is_empty() {
            return Vec::new();
        }
        let names: Vec<String> = self
            .items
            .values()
            .filter(|item| item.block_name() == block_name)
            .map(|item| item.name().to_string())
            .collect();
        let removed: Vec<ValueItem> = names.iter().filter_map(|name| self.remove_value_item(name)).collect();
        if !removed.is_empty() {
            debug!(block = block_name, count = removed.len(), "Removed value items of block");
            self.notify(ChangeKind::ContainerNumberChange, None);
        }
        removed
    }

    // =========================================================================
    // ORDERING
    // =========================================================================

    fn sorted_names(&self) -> Vec<String> {
        self.sorted_value_items()
            .into_iter()
            .map(|item| item.name().to_string())
            .collect()
    }

    /// Renumbers vertical positions densely from 0, block by block.
    ///
    /// Blocks are ordered by name; inside a block the existing order is kept.
    pub fn sort_blocks(&mut self, is_notification_suppressed: bool) {
        if self.items.is_empty() {
            return;
        }
        let blocks: BTreeSet<String> = self
            .items
            .values()
            .map(|item| item.block_name().to_string())
            .collect();
        let mut position = 0;
        for block in &blocks {
            let names: Vec<String> = self
                .sorted_value_items_of_block(block)
                .into_iter()
                .map(|item| item.name().to_string())
                .collect();
            for name in names {
                if let Some(item) = self.items.get_mut(&name) {
                    item.set_vertical_position(position);
                    position += 1;
                }
            }
        }
        debug!(blocks = blocks.len(), items = position, "Sorted value item blocks");
        if !is_notification_suppressed {
            self.notify(ChangeKind::ContainerSortChange, None);
        }
    }

    /// Numbers all items in their current order from `start`; returns the
    /// next free position.
    pub fn set_successive_vertical_positions(&mut self, start: i32) -> i32 {
        let mut position = start;
        for name in self.sorted_names() {
            if let Some(item) = self.items.get_mut(&name) {
                item.set_vertical_position(position);
                position += 1;
            }
        }
        position
    }

    /// Largest vertical position, or -1 for an empty container.
    pub fn maximum_vertical_position(&self) -> i32 {
        self.items
            .values()
            .map(ValueItem::vertical_position)
            .max()
            .unwrap_or(-1)
    }

    pub fn maximum_vertical_position_value_item(&self) -> Option<&ValueItem> {
        self.sorted_value_items().into_iter().last()
    }

    pub fn maximum_vertical_position_value_item_node_names(&self) -> Option<&[String]> {
        self.maximum_vertical_position_value_item().map(ValueItem::node_names)
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// All items in storage order.
    pub fn value_items(&self) -> Vec<&ValueItem> {
        let names = cached(&self.value_item_names, || self.items.keys().cloned().collect());
        names.iter().filter_map(|name| self.items.get(name)).collect()
    }

    /// All items by vertical position.
    pub fn sorted_value_items(&self) -> Vec<&ValueItem> {
        let mut items: Vec<&ValueItem> = self.items.values().collect();
        items.sort_by(|a, b| by_vertical_position(a, b));
        items
    }

    /// All items by name.
    pub fn name_sorted_value_items(&self) -> Vec<&ValueItem> {
        let names = cached(&self.sorted_value_item_names, || {
            let mut names: Vec<String> = self.items.keys().cloned().collect();
            names.sort();
            names
        });
        names.iter().filter_map(|name| self.items.get(name)).collect()
    }

    /// All items by display name, ties by name.
    pub fn display_name_sorted_value_items(&self) -> Vec<&ValueItem> {
        let mut items: Vec<&ValueItem> = self.items.values().collect();
        items.sort_by(|a, b| a.display_name().cmp(b.display_name()).then_with(|| a.name().cmp(b.name())));
        items
    }

    pub fn sorted_value_items_with_prefix(&self, prefix: &str) -> Vec<&ValueItem> {
        self.sorted_value_items()
            .into_iter()
            .filter(|item| item.name().starts_with(prefix))
            .collect()
    }

    pub fn sorted_value_items_with_status(&self, status: ValueItemStatus) -> Vec<&ValueItem> {
        self.sorted_value_items()
            .into_iter()
            .filter(|item| item.has_status(status))
            .collect()
    }

    /// First item by vertical position with the given status.
    pub fn value_item_with_status(&self, status: ValueItemStatus) -> Option<&ValueItem> {
        self.sorted_value_items()
            .into_iter()
            .find(|item| item.has_status(status))
    }

    pub fn value_item(&self, name: &str) -> Option<&ValueItem> {
        self.items.get(name)
    }

    /// Mutable access by name.
    ///
    /// Renaming the item through this reference leaves it stored under its
    /// old name.
    pub fn value_item_mut(&mut self, name: &str) -> Option<&mut ValueItem> {
        self.items.get_mut(name)
    }

    /// Items whose name starts with any of the prefixes, by vertical position.
    pub fn value_items_with_prefixes<S: AsRef<str>>(&self, prefixes: &[S]) -> Vec<&ValueItem> {
        self.sorted_value_items()
            .into_iter()
            .filter(|item| prefixes.iter().any(|prefix| item.name().starts_with(prefix.as_ref())))
            .collect()
    }

    /// Cursor value of the named item.
    pub fn value_of_value_item(&self, name: &str) -> Option<&str> {
        self.items.get(name).and_then(ValueItem::value)
    }

    pub fn sorted_value_item_display_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.items.values().map(ValueItem::display_name).collect();
        names.sort_unstable();
        names
    }

    /// Item referenced by the named item's data cross-reference.
    pub fn data_value_item_of(&self, name: &str) -> Option<&ValueItem> {
        let target = self.items.get(name)?.name_of_data_value_item();
        if target.is_empty() {
            return None;
        }
        self.items.get(target)
    }

    /// Item referenced by the named item's display cross-reference.
    pub fn display_value_item_of(&self, name: &str) -> Option<&ValueItem> {
        let target = self.items.get(name)?.name_of_display_value_item();
        if target.is_empty() {
            return None;
        }
        self.items.get(target)
    }

    // =========================================================================
    // BLOCKS
    // =========================================================================

    /// Distinct block names in vertical order of their first item.
    pub fn block_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.sorted_value_items()
            .into_iter()
            .map(ValueItem::block_name)
            .filter(|block| seen.insert(*block))
            .collect()
    }

    pub fn value_items_of_block(&self, block_name: &str) -> Vec<&ValueItem> {
        if block_name.is_empty() {
            return Vec::new();
        }
        self.items
            .values()
            .filter(|item| item.block_name() == block_name)
            .collect()
    }

    pub fn sorted_value_items_of_block(&self, block_name: &str) -> Vec<&ValueItem> {
        let mut items = self.value_items_of_block(block_name);
        items.sort_by(|a, b| by_vertical_position(a, b));
        items
    }

    pub fn sorted_value_items_of_block_with_status(&self, block_name: &str, status: ValueItemStatus) -> Vec<&ValueItem> {
        self.sorted_value_items_of_block(block_name)
            .into_iter()
            .filter(|item| item.has_status(status))
            .collect()
    }

    /// First item of the block whose name starts with `name_prefix`.
    pub fn value_item_of_block(&self, block_name: &str, name_prefix: &str) -> Option<&ValueItem> {
        if name_prefix.is_empty() {
            return None;
        }
        self.sorted_value_items_of_block(block_name)
            .into_iter()
            .find(|item| item.name().starts_with(name_prefix))
    }

    pub fn set_value_item_display_of_block(&mut self, block_name: &str, is_displayed: bool) {
        for item in self.items.values_mut() {
            if !block_name.is_empty() && item.block_name() == block_name {
                item.set_display(is_displayed);
            }
        }
    }

    // =========================================================================
    // DISPLAY
    // =========================================================================

    /// Hides every item not named in `displayed`; returns the hidden names.
    pub fn set_defined_display(&mut self, displayed: &HashSet<String>) -> Vec<String> {
        if displayed.is_empty() {
            return Vec::new();
        }
        let mut hidden = Vec::new();
        for item in self.items.values_mut() {
            if !displayed.contains(item.name()) {
                item.set_display(false);
                hidden.push(item.name().to_string());
            }
        }
        hidden.sort();
        hidden
    }

    /// Shows the items hidden by [`set_defined_display`](Self::set_defined_display).
    pub fn restore_defined_display<S: AsRef<str>>(&mut self, hidden: &[S]) {
        for name in hidden {
            if let Some(item) = self.items.get_mut(name.as_ref()) {
                item.set_display(true);
            }
        }
    }

    // =========================================================================
    // PREDICATES
    // =========================================================================

    pub fn has_value_item(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn has_value_item_with_display_name(&self, display_name: &str) -> bool {
        !display_name.is_empty() && self.items.values().any(|item| item.display_name() == display_name)
    }

    pub fn has_value_item_with_compartments(&self) -> bool {
        self.items.values().any(ValueItem::has_compartments)
    }

    /// True if a displayed item has the status.
    pub fn has_status(&self, status: ValueItemStatus) -> bool {
        self.items
            .values()
            .any(|item| item.is_displayed() && item.has_status(status))
    }

    pub fn has_error(&self) -> bool {
        self.has_status(ValueItemStatus::HasError)
    }

    pub fn has_hint(&self) -> bool {
        self.has_status(ValueItemStatus::HasHint)
    }

    // =========================================================================
    // MUTATION HELPERS
    // =========================================================================

    /// Sets the cursor value of the named item.
    ///
    /// Returns false if there is no such item. A changed value of an update
    /// notifier item triggers the dependency update.
    pub fn set_value_of_value_item(&mut self, name: &str, value: &str) -> Result<bool> {
        let Some(item) = self.items.get_mut(name) else {
            return Ok(false);
        };
        if item.set_value(value)? {
            self.notify_dependent_value_items_for_update(name);
        }
        Ok(true)
    }

    /// Appends `_<index>` to every item name.
    pub fn add_index_to_value_item_names(&mut self, index: usize) {
        let items: Vec<ValueItem> = self.items.drain().map(|(_, item)| item).collect();
        for mut item in items {
            let name = format!("{}_{index}", item.name());
            item.set_name(&name);
            self.items.insert(name, item);
        }
        self.invalidate_caches();
    }

    /// Prepends `node_name` to every non-empty node path not starting with it.
    pub fn add_node_name_at_first_position(&mut self, node_name: &str) {
        if node_name.is_empty() {
            return;
        }
        for item in self.items.values_mut() {
            let node_names = item.node_names();
            if node_names.first().is_some_and(|first| first != node_name) {
                let mut updated = Vec::with_capacity(node_names.len() + 1);
                updated.push(node_name.to_string());
                updated.extend_from_slice(node_names);
                item.set_node_names(updated);
            }
        }
    }

    /// Replaces the first element of every non-empty node path.
    pub fn replace_node_name_at_first_position(&mut self, node_name: &str) {
        if node_name.is_empty() {
            return;
        }
        for item in self.items.values_mut() {
            let mut node_names = item.node_names().to_vec();
            if let Some(first) = node_names.first_mut()
                && first != node_name
            {
                *first = node_name.to_string();
                item.set_node_names(node_names);
            }
        }
    }

    pub fn set_node_names(&mut self, node_names: &[String]) {
        if node_names.is_empty() {
            return;
        }
        for item in self.items.values_mut() {
            item.set_node_names(node_names.to_vec());
        }
    }

    /// Asks the update notifier to refresh items depending on `name`.
    ///
    /// Only update-notifier items trigger this. Nested requests deeper than
    /// the configured update depth are dropped.
    pub fn notify_dependent_value_items_for_update(&mut self, name: &str) {
        if !self.items.get(name).is_some_and(ValueItem::is_update_notifier) {
            return;
        }
        let Some(update_notifier) = self.update_notifier.clone() else {
            return;
        };
        if self.update_depth >= self.options.max_update_depth {
            warn!(
                item = name,
                depth = self.update_depth,
                "Dependency update depth exceeded, update dropped"
            );
            return;
        }
        self.update_depth += 1;
        update_notifier.notify_dependent_value_items_for_update(self, name);
        self.update_depth -= 1;
    }

    // =========================================================================
    // XML
    // =========================================================================

    /// Document element with the items in vertical order.
    pub fn to_xml_element(&self) -> XmlElement {
        let mut root = XmlElement::versioned(VALUE_ITEM_CONTAINER);
        for item in self.sorted_value_items() {
            root.push(item.to_xml_element());
        }
        root
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let xml = self.to_xml_element().to_xml_string()?;
        info!(items = self.size(), bytes = xml.len(), "Serialized value item container");
        Ok(xml)
    }

    pub fn from_xml_element(element: &XmlElement, options: ModelOptions) -> Result<Self> {
        element.expect_name(VALUE_ITEM_CONTAINER)?;
        element.check_version()?;
        let mut container = Self::with_options(options);
        for child in element.children_named(VALUE_ITEM) {
            container.add_value_item(ValueItem::from_xml_element_with_options(child, options)?)?;
        }
        info!(items = container.size(), "Loaded value item container");
        Ok(container)
    }

    pub fn from_xml_str(input: &str) -> Result<Self> {
        Self::from_xml_element(&parse_xml(input)?, ModelOptions::default())
    }
}

impl Clone for ValueItemContainer {
    /// Detached copy with a new identity, the same update notifier and no
    /// container receivers.
    fn clone(&self) -> Self {
        let mut clone = Self::with_options(self.options);
        clone.update_notifier = self.update_notifier.clone();
        for item in self.items.values() {
            let mut copy = item.clone();
            if copy.add_change_receiver(Rc::clone(&clone.forwarder)).is_ok() {
                copy.bind_container(clone.id);
            }
            clone.items.insert(copy.name().to_string(), copy);
        }
        clone
    }
}

impl fmt::Debug for ValueItemContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueItemContainer")
            .field("id", &self.id)
            .field("size", &self.items.len())
            .field("has_update_notifier", &self.update_notifier.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::change::{ChangeOrigin, ChangeRecorder};
    use crate::enums::BasicType;
    use crate::type_format::TypeFormat;

    fn item(name: &str, block: &str, position: i32) -> ValueItem {
        let mut item = ValueItem::named(name, BasicType::Scalar);
        item.set_block_name(block);
        item.set_vertical_position(position);
        item.set_default_type_format(TypeFormat::text("x"));
        item
    }

    fn names(items: &[&ValueItem]) -> Vec<String> {
        items.iter().map(|item| item.name().to_string()).collect()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut container = ValueItemContainer::new();
        container.add_value_item(item("A", "B1", 0)).unwrap();
        assert!(matches!(
            container.add_value_item(item("A", "B1", 1)),
            Err(ModelError::DuplicateName { .. })
        ));
        let batch = vec![item("C", "B1", 2), item("A", "B1", 3)];
        assert!(container.add_value_items(batch, false).is_err());
        assert!(!container.has_value_item("C"));
        assert_eq!(container.value_item("A").unwrap().container_id(), Some(container.id()));
    }

    #[test]
    fn item_changes_reach_container_receivers() {
        let mut container = ValueItemContainer::new();
        let recorder = ChangeRecorder::new();
        container.notifier().add_change_receiver(recorder.clone()).unwrap();
        container.add_value_item(item("A", "B1", 0)).unwrap();
        assert!(recorder.events().is_empty());

        container.value_item_mut("A").unwrap().set_activity(false);
        assert_eq!(recorder.kinds(), [ChangeKind::ActivityChange]);
        assert_eq!(recorder.events()[0].origin, ChangeOrigin::ValueItem("A".into()));

        let removed = container.remove_value_item("A").unwrap();
        assert_eq!(removed.container_id(), None);
        assert_eq!(removed.notifier().receiver_count(), 0);
    }

    #[test]
    fn batch_add_announces_first_block() {
        let mut container = ValueItemContainer::new();
        let recorder = ChangeRecorder::new();
        container.notifier().add_change_receiver(recorder.clone()).unwrap();
        container
            .add_value_items(vec![item("A", "Second", 0), item("B", "First", 1)], false)
            .unwrap();
        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::ContainerNumberChange);
        assert_eq!(events[0].info.as_deref(), Some("Second"));
    }

    #[test]
    fn sort_blocks_renumbers_densely() {
        let mut container = ValueItemContainer::new();
        for (name, block, position) in [("a", "Z", 5), ("b", "A", 9), ("c", "A", 2), ("d", "Z", 1)] {
            container.add_value_item(item(name, block, position)).unwrap();
        }
        container.sort_blocks(true);
        assert_eq!(names(&container.sorted_value_items()), ["c", "b", "d", "a"]);
        assert_eq!(container.maximum_vertical_position(), 3);
        assert_eq!(container.block_names(), ["A", "Z"]);
    }

    #[test]
    fn insert_before_shifts_following_items() {
        let mut container = ValueItemContainer::new();
        for (name, position) in [("a", 0), ("b", 1), ("c", 2)] {
            container.add_value_item(item(name, "B", position)).unwrap();
        }
        assert!(container.insert_value_item_before(item("new", "B", 0), "b").unwrap());
        assert_eq!(names(&container.sorted_value_items()), ["a", "new", "b", "c"]);
        assert_eq!(container.value_item("c").unwrap().vertical_position(), 3);
        assert!(!container.insert_value_item_before(item("x", "B", 0), "missing").unwrap());
    }

    #[test]
    fn successive_positions_and_empty_maximum() {
        let mut container = ValueItemContainer::new();
        assert_eq!(container.maximum_vertical_position(), -1);
        assert_eq!(container.set_successive_vertical_positions(10), 10);
        container.add_value_item(item("a", "B", 7)).unwrap();
        container.add_value_item(item("b", "B", 3)).unwrap();
        assert_eq!(container.set_successive_vertical_positions(10), 12);
        assert_eq!(container.value_item("b").unwrap().vertical_position(), 10);
    }

    #[test]
    fn defined_display_round_trip() {
        let mut container = ValueItemContainer::new();
        for name in ["a", "b", "c"] {
            container.add_value_item(item(name, "B", 0)).unwrap();
        }
        let keep: HashSet<String> = ["b".to_string()].into();
        let hidden = container.set_defined_display(&keep);
        assert_eq!(hidden, ["a", "c"]);
        assert!(!container.value_item("a").unwrap().is_displayed());
        container.restore_defined_display(&hidden);
        assert!(container.value_item("a").unwrap().is_displayed());
    }

    #[test]
    fn index_suffix_rekeys_items() {
        let mut container = ValueItemContainer::new();
        container.add_value_item(item("Seed", "B", 0)).unwrap();
        container.add_index_to_value_item_names(2);
        assert!(container.has_value_item("Seed_2"));
        assert!(!container.has_value_item("Seed"));
        assert_eq!(names(&container.name_sorted_value_items()), ["Seed_2"]);
    }

    struct CountingUpdater {
        calls: Cell<usize>,
    }

    impl UpdateNotifier for CountingUpdater {
        fn notify_dependent_value_items_for_update(&self, container: &mut ValueItemContainer, item_name: &str) {
            self.calls.set(self.calls.get() + 1);
            container.notify_dependent_value_items_for_update(item_name);
        }
    }

    #[test]
    fn dependency_updates_are_depth_limited() {
        let options = ModelOptions::default().with_max_update_depth(3);
        let mut container = ValueItemContainer::with_options(options);
        let updater = Rc::new(CountingUpdater { calls: Cell::new(0) });
        container.set_update_notifier(updater.clone());
        let mut notifier_item = item("Temperature", "B", 0);
        notifier_item.set_update_notifier(true);
        container.add_value_item(notifier_item).unwrap();
        container.add_value_item(item("Plain", "B", 1)).unwrap();

        assert!(container.set_value_of_value_item("Temperature", "300").unwrap());
        assert_eq!(updater.calls.get(), 3);
        assert!(!container.set_value_of_value_item("Missing", "1").unwrap());
        container.set_value_of_value_item("Plain", "y").unwrap();
        assert_eq!(updater.calls.get(), 3);
    }

    #[test]
    fn clear_keeps_update_notifier() {
        let mut container = ValueItemContainer::new();
        container.set_update_notifier(Rc::new(CountingUpdater { calls: Cell::new(0) }));
        container.add_value_item(item("a", "B", 0)).unwrap();
        container.clear();
        assert!(container.is_empty());
        assert!(format!("{container:?}").contains("has_update_notifier: true"));
    }
}
