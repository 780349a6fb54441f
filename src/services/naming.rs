//! Name validation and collision handling for children of one parent.

use crate::core::errors::{Error, Result};
use crate::models::entry::Entry;

/// Verdict of a name validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCheck {
    Accept,
    Rewrite(String),
    Reject(String),
}

/// `a.txt` -> `a(1).txt` for attempt 0, `a(2).txt` for attempt 1, ...
pub fn default_variant(current: &str, attempt: usize) -> String {
    let id = format!("({})", attempt + 1);
    match current.rfind('.') {
        Some(dot) => format!("{}{}{}", &current[..dot], id, &current[dot..]),
        None => format!("{current}{id}"),
    }
}

/// Structural rules every name must follow, whatever the hooks say.
pub fn default_validator(candidate: &str) -> NameCheck {
    if candidate.is_empty() {
        NameCheck::Reject("name cannot be empty".to_string())
    } else if candidate.contains('/') {
        NameCheck::Reject("name cannot contain '/'".to_string())
    } else if candidate.contains('\0') {
        NameCheck::Reject("name cannot contain NUL".to_string())
    } else if candidate == "." || candidate == ".." {
        NameCheck::Reject(format!("{candidate:?} is reserved"))
    } else {
        NameCheck::Accept
    }
}

fn apply(candidate: &str, check: NameCheck) -> Result<String> {
    match check {
        NameCheck::Accept => Ok(candidate.to_string()),
        NameCheck::Rewrite(rewritten) => Ok(rewritten),
        NameCheck::Reject(reason) => Err(Error::InvalidName {
            name: candidate.to_string(),
            reason,
        }),
    }
}

/// Runs the default rules only, for entries without a parent.
pub fn check_content(candidate: &str) -> Result<String> {
    apply(candidate, default_validator(candidate))
}

/// Runs `parent`'s validator hook (if any) and then the default rules.
pub fn validate(parent: &Entry, candidate: &str) -> Result<String> {
    let checked = match parent.resolve(|hooks| hooks.validator.clone()) {
        Some(validator) => apply(candidate, validator(candidate))?,
        None => candidate.to_string(),
    };
    check_content(&checked)
}

pub fn is_name_unique(parent: &Entry, name: &str) -> bool {
    is_name_unique_except(parent, name, None)
}

pub(crate) fn is_name_unique_except(parent: &Entry, name: &str, except: Option<&Entry>) -> bool {
    parent.children_cell().map_or(true, |children| {
        children
            .entries
            .borrow()
            .iter()
            .all(|child| Some(child) == except || !child.has_name(name))
    })
}

/// Validates `candidate` and returns it, or the first free variant of it.
pub fn unique_name(parent: &Entry, candidate: &str) -> Result<String> {
    unique_name_except(parent, candidate, None)
}

pub(crate) fn unique_name_except(
    parent: &Entry,
    candidate: &str,
    except: Option<&Entry>,
) -> Result<String> {
    let base = validate(parent, candidate)?;
    if is_name_unique_except(parent, &base, except) {
        return Ok(base);
    }

    let variant = parent.resolve(|hooks| hooks.variant.clone());
    // With an injective generator one of siblings + 1 variants must be free.
    let attempts = parent.child_count() + 1;
    for attempt in 0..attempts {
        let next = match &variant {
            Some(variant) => variant(&base, attempt),
            None => default_variant(&base, attempt),
        };
        let next = validate(parent, &next)?;
        if is_name_unique_except(parent, &next, except) {
            return Ok(next);
        }
    }
    Err(Error::NamesExhausted {
        candidate: base,
        attempts,
    })
}

impl Entry {
    pub fn is_name_unique(&self, name: &str) -> bool {
        is_name_unique(self, name)
    }

    pub fn unique_name(&self, candidate: &str) -> Result<String> {
        unique_name(self, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::ItemInit;
    use crate::models::hooks::Hooks;

    fn root_with(names: &[&str]) -> Result<Entry> {
        let root = Entry::root();
        for name in names {
            root.append(Entry::file(ItemInit::new(*name)))?;
        }
        Ok(root)
    }

    #[test]
    fn variant_goes_before_the_last_dot() {
        assert_eq!(default_variant("a.txt", 0), "a(1).txt");
        assert_eq!(default_variant("a.tar.gz", 1), "a.tar(2).gz");
        assert_eq!(default_variant("folder", 2), "folder(3)");
    }

    #[test]
    fn unique_name_picks_next_free_variant() -> Result<()> {
        assert_eq!(root_with(&[])?.unique_name("a.txt")?, "a.txt");
        assert_eq!(root_with(&["a.txt"])?.unique_name("a.txt")?, "a(1).txt");
        assert_eq!(
            root_with(&["a.txt", "a(1).txt"])?.unique_name("a.txt")?,
            "a(2).txt"
        );
        Ok(())
    }

    #[test]
    fn rejection_short_circuits() -> Result<()> {
        let root = root_with(&["a"])?;
        let err = root.unique_name("x/y").unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(err.is_validation());
        Ok(())
    }

    #[test]
    fn validator_hook_can_rewrite() -> Result<()> {
        let root = Entry::root_with(Hooks::new().with_validator(|candidate: &str| {
            if candidate.chars().any(char::is_uppercase) {
                NameCheck::Rewrite(candidate.to_lowercase())
            } else {
                NameCheck::Accept
            }
        }));
        root.append(Entry::file(ItemInit::new("readme")))?;

        assert_eq!(root.unique_name("README")?, "readme(1)");
        Ok(())
    }

    #[test]
    fn non_injective_generator_is_bounded() -> Result<()> {
        let root = root_with(&["a", "b"])?;
        root.update_hooks(|hooks| {
            hooks.variant = Some(std::rc::Rc::new(|_: &str, _: usize| "b".to_string()));
        });

        let err = root.unique_name("a").unwrap_err();
        assert!(matches!(err, Error::NamesExhausted { attempts: 3, .. }));
        Ok(())
    }

    #[test]
    fn uniqueness_can_exclude_an_entry() -> Result<()> {
        let root = root_with(&["a"])?;
        let a = root.child(0).ok_or(Error::Detached)?;
        assert!(!root.is_name_unique("a"));
        assert!(is_name_unique_except(&root, "a", Some(&a)));
        assert_eq!(unique_name_except(&root, "a", Some(&a))?, "a");
        Ok(())
    }

    #[test]
    fn reserved_names_are_rejected() {
        for name in ["", ".", "..", "a\0b"] {
            assert!(check_content(name).is_err(), "{name:?} should be rejected");
        }
        assert_eq!(check_content("ok.txt").ok().as_deref(), Some("ok.txt"));
    }
}
