use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::models::entry::{Entry, ItemKind};
use crate::models::icon::IconKey;
use crate::services::context_menu::MenuItem;
use crate::services::naming::NameCheck;
use crate::services::search::SearchPriority;
use crate::services::tree::build::EntryFactory;
use crate::services::tree::scheduler::Scheduler;

pub type NameValidator = Rc<dyn Fn(&str) -> NameCheck>;
pub type VariantGenerator = Rc<dyn Fn(&str, usize) -> String>;
pub type Comparator = Rc<dyn Fn(&Entry, &Entry) -> Ordering>;
pub type DefaultName = Rc<dyn Fn(ItemKind) -> String>;
pub type DefaultIcon = Rc<dyn Fn(IconKey) -> String>;
pub type ContextMenuSupplier = Rc<dyn Fn(&Entry) -> Vec<MenuItem>>;

/// Overridable behaviour attached to a root or folder.
///
/// Lookups start at the entry that needs the hook and walk up through its
/// ancestors; the first parent that sets a hook wins, and the built-in default
/// applies when none does. Hooks on the root therefore act as tree-wide
/// defaults.
#[derive(Clone, Default)]
pub struct Hooks {
    pub validator: Option<NameValidator>,
    pub variant: Option<VariantGenerator>,
    pub comparator: Option<Comparator>,
    pub default_name: Option<DefaultName>,
    pub default_icon: Option<DefaultIcon>,
    pub context_menu: Option<ContextMenuSupplier>,
    pub factory: Option<Rc<dyn EntryFactory>>,
    pub scheduler: Option<Rc<dyn Scheduler>>,
    pub search_priority: Option<SearchPriority>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(mut self, validator: impl Fn(&str) -> NameCheck + 'static) -> Self {
        self.validator = Some(Rc::new(validator));
        self
    }

    pub fn with_variant(mut self, variant: impl Fn(&str, usize) -> String + 'static) -> Self {
        self.variant = Some(Rc::new(variant));
        self
    }

    pub fn with_comparator(
        mut self,
        comparator: impl Fn(&Entry, &Entry) -> Ordering + 'static,
    ) -> Self {
        self.comparator = Some(Rc::new(comparator));
        self
    }

    pub fn with_default_name(
        mut self,
        default_name: impl Fn(ItemKind) -> String + 'static,
    ) -> Self {
        self.default_name = Some(Rc::new(default_name));
        self
    }

    pub fn with_default_icon(mut self, default_icon: impl Fn(IconKey) -> String + 'static) -> Self {
        self.default_icon = Some(Rc::new(default_icon));
        self
    }

    pub fn with_context_menu(
        mut self,
        context_menu: impl Fn(&Entry) -> Vec<MenuItem> + 'static,
    ) -> Self {
        self.context_menu = Some(Rc::new(context_menu));
        self
    }

    pub fn with_factory(mut self, factory: impl EntryFactory + 'static) -> Self {
        self.factory = Some(Rc::new(factory));
        self
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_search_priority(mut self, priority: SearchPriority) -> Self {
        self.search_priority = Some(priority);
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("validator", &self.validator.is_some())
            .field("variant", &self.variant.is_some())
            .field("comparator", &self.comparator.is_some())
            .field("default_name", &self.default_name.is_some())
            .field("default_icon", &self.default_icon.is_some())
            .field("context_menu", &self.context_menu.is_some())
            .field("factory", &self.factory.is_some())
            .field("scheduler", &self.scheduler.is_some())
            .field("search_priority", &self.search_priority)
            .finish()
    }
}
