use std::collections::BTreeSet;

/// Index changes needed to move a subscriber from one form to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDiff {
    pub removed: BTreeSet<String>,
    pub added: BTreeSet<String>,
}

impl FormDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removed.len() + self.added.len()
    }
}

/// Symmetric difference of two token lists.
///
/// Order and duplicates are ignored: tokens only in `old` are `removed`, tokens
/// only in `new` are `added`, tokens in both appear in neither.
pub fn diff<A: AsRef<str>, B: AsRef<str>>(old: &[A], new: &[B]) -> FormDiff {
    let old = old.iter().map(AsRef::as_ref).collect::<BTreeSet<&str>>();
    let new = new.iter().map(AsRef::as_ref).collect::<BTreeSet<&str>>();

    FormDiff {
        removed: old.difference(&new).map(|token| (*token).to_owned()).collect(),
        added: new.difference(&old).map(|token| (*token).to_owned()).collect(),
    }
}
