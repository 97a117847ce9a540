/// Selected node ids in insertion order. Order carries no meaning beyond
/// making iteration deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click on `id`: with the modifier held membership toggles, otherwise
    /// the selection becomes just `id`.
    pub fn handle_interaction(&mut self, id: &str, toggle: bool) {
        if toggle {
            if !self.remove(id) {
                self.ids.push(id.to_string());
            }
        } else {
            if self.ids.len() == 1 && self.contains(id) {
                return;
            }
            self.ids.clear();
            self.ids.push(id.to_string());
        }
    }

    pub fn replace_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.clear();
        for id in ids {
            let id = id.into();
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    /// Drop ids for which `keep` is false.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|s| keep(s));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_click_replaces() {
        let mut s = SelectionSet::new();
        s.handle_interaction("a", false);
        s.handle_interaction("b", false);
        assert!(!s.contains("a"));
        assert!(s.contains("b"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn modifier_click_toggles() {
        let mut s = SelectionSet::new();
        s.handle_interaction("a", false);
        s.handle_interaction("b", true);
        assert_eq!(s.to_vec(), vec!["a", "b"]);
        s.handle_interaction("a", true);
        assert_eq!(s.to_vec(), vec!["b"]);
        s.handle_interaction("b", true);
        assert!(s.is_empty());
    }

    #[test]
    fn plain_click_on_sole_selection_keeps_it() {
        let mut s = SelectionSet::new();
        s.handle_interaction("a", false);
        s.handle_interaction("a", false);
        assert_eq!(s.to_vec(), vec!["a"]);
    }

    #[test]
    fn replace_dedupes() {
        let mut s = SelectionSet::new();
        s.replace_selection(["x", "y", "x"]);
        assert_eq!(s.len(), 2);
    }
}
