use parking_lot::RwLock;
use tracing::info;

use voicegate_voiceprint::FeatureVector;

use crate::template::validate;
use crate::{Category, Template, TemplateError};

/// Holds enrolled templates per category.
///
/// Enrollment appends; templates sharing a label are kept side by side and
/// never merged. Implementations must be safe for concurrent use, and a
/// reader must observe either the state before a write or after it.
///
/// Use [`MemoryStore`] for ephemeral use, [`crate::FileStore`] to persist.
pub trait TemplateStore: Send + Sync {
    /// Appends a template. Returns its position within the category.
    fn enroll(
        &self,
        category: Category,
        label: &str,
        features: FeatureVector,
    ) -> Result<usize, TemplateError>;

    /// Returns the templates of a category in enrollment order.
    fn all(&self, category: Category) -> Result<Vec<Template>, TemplateError>;

    /// Removes every template of `category` labelled `label`.
    /// Returns how many were removed.
    fn remove(&self, category: Category, label: &str) -> Result<usize, TemplateError>;

    /// Returns the number of templates in a category.
    fn len(&self, category: Category) -> Result<usize, TemplateError> {
        Ok(self.all(category)?.len())
    }

    /// Returns distinct labels with their sample counts, in first-enrollment order.
    fn labels(&self, category: Category) -> Result<Vec<(String, usize)>, TemplateError> {
        let mut out: Vec<(String, usize)> = Vec::new();
        for t in self.all(category)? {
            match out.iter_mut().find(|(l, _)| *l == t.label) {
                Some((_, n)) => *n += 1,
                None => out.push((t.label, 1)),
            }
        }
        Ok(out)
    }
}

/// Templates of both categories, as held in memory and on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Templates {
    pub(crate) command: Vec<Template>,
    pub(crate) speaker: Vec<Template>,
}

impl Templates {
    pub(crate) fn get(&self, category: Category) -> &Vec<Template> {
        match category {
            Category::Command => &self.command,
            Category::Speaker => &self.speaker,
        }
    }

    pub(crate) fn get_mut(&mut self, category: Category) -> &mut Vec<Template> {
        match category {
            Category::Command => &mut self.command,
            Category::Speaker => &mut self.speaker,
        }
    }

    /// Dimension shared by every stored vector, if any are stored.
    pub(crate) fn dimension(&self) -> Option<usize> {
        self.command
            .iter()
            .chain(&self.speaker)
            .map(|t| t.features.len())
            .next()
    }

    /// Validates and appends a template, returning its position.
    pub(crate) fn push(
        &mut self,
        category: Category,
        label: &str,
        features: FeatureVector,
    ) -> Result<usize, TemplateError> {
        validate(label, &features)?;
        if let Some(dim) = self.dimension() {
            if dim != features.len() {
                return Err(TemplateError::InvalidTemplate(format!(
                    "feature dimension {} differs from enrolled dimension {dim}",
                    features.len()
                )));
            }
        }
        let list = self.get_mut(category);
        list.push(Template::new(label.trim(), features));
        Ok(list.len() - 1)
    }

    pub(crate) fn remove(&mut self, category: Category, label: &str) -> usize {
        let label = label.trim();
        let list = self.get_mut(category);
        let before = list.len();
        list.retain(|t| t.label != label);
        before - list.len()
    }
}

/// In-memory [`TemplateStore`] implementation.
/// Data is lost on restart. Suitable for testing or ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Templates>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryStore {
    fn enroll(
        &self,
        category: Category,
        label: &str,
        features: FeatureVector,
    ) -> Result<usize, TemplateError> {
        let idx = self.inner.write().push(category, label, features)?;
        info!(%category, label, idx, "enrolled template");
        Ok(idx)
    }

    fn all(&self, category: Category) -> Result<Vec<Template>, TemplateError> {
        Ok(self.inner.read().get(category).clone())
    }

    fn remove(&self, category: Category, label: &str) -> Result<usize, TemplateError> {
        Ok(self.inner.write().remove(category, label))
    }

    fn len(&self, category: Category) -> Result<usize, TemplateError> {
        Ok(self.inner.read().get(category).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn fv(v: &[f32]) -> FeatureVector {
        FeatureVector::new(v.to_vec())
    }

    #[test]
    fn enroll_appends_in_order() {
        let store = MemoryStore::new();
        assert_eq!(store.enroll(Category::Command, "open", fv(&[1.0, 0.0])).unwrap(), 0);
        assert_eq!(store.enroll(Category::Command, "open", fv(&[0.9, 0.1])).unwrap(), 1);
        assert_eq!(store.enroll(Category::Command, "close", fv(&[0.0, 1.0])).unwrap(), 2);
        assert_eq!(store.enroll(Category::Speaker, "owner1", fv(&[0.5, 0.5])).unwrap(), 0);

        let all = store.all(Category::Command).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].features.as_slice(), &[0.9, 0.1]);
        assert_eq!(store.len(Category::Speaker).unwrap(), 1);
    }

    #[test]
    fn empty_category() {
        let store = MemoryStore::new();
        assert!(store.all(Category::Speaker).unwrap().is_empty());
        assert_eq!(store.len(Category::Command).unwrap(), 0);
    }

    #[test]
    fn labels_with_counts() {
        let store = MemoryStore::new();
        for label in ["close", "open", "close", "close"] {
            store.enroll(Category::Command, label, fv(&[1.0])).unwrap();
        }
        assert_eq!(
            store.labels(Category::Command).unwrap(),
            vec![("close".to_string(), 3), ("open".to_string(), 1)]
        );
    }

    #[test]
    fn rejects_invalid() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.enroll(Category::Command, "", fv(&[1.0])),
            Err(TemplateError::InvalidTemplate(_))
        ));
        assert!(matches!(
            store.enroll(Category::Command, "open", fv(&[f32::NAN])),
            Err(TemplateError::InvalidTemplate(_))
        ));

        store.enroll(Category::Command, "open", fv(&[1.0, 2.0])).unwrap();
        // Dimension is shared across categories.
        assert!(matches!(
            store.enroll(Category::Speaker, "owner1", fv(&[1.0, 2.0, 3.0])),
            Err(TemplateError::InvalidTemplate(_))
        ));
        assert_eq!(store.len(Category::Speaker).unwrap(), 0);
    }

    #[test]
    fn remove_by_label() {
        let store = MemoryStore::new();
        store.enroll(Category::Speaker, "owner1", fv(&[1.0])).unwrap();
        store.enroll(Category::Speaker, "guest", fv(&[2.0])).unwrap();
        store.enroll(Category::Speaker, "owner1", fv(&[3.0])).unwrap();

        assert_eq!(store.remove(Category::Speaker, "owner1").unwrap(), 2);
        assert_eq!(store.remove(Category::Speaker, "nobody").unwrap(), 0);
        let rest = store.all(Category::Speaker).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].label, "guest");
    }

    #[test]
    fn concurrent_enroll_and_read() {
        let store = Arc::new(MemoryStore::new());
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store
                            .enroll(Category::Command, "open", fv(&[w as f32, i as f32]))
                            .unwrap();
                    }
                })
            })
            .collect();
        for _ in 0..100 {
            for t in store.all(Category::Command).unwrap() {
                assert_eq!(t.features.len(), 2);
            }
        }
        for h in writers {
            h.join().unwrap();
        }
        assert_eq!(store.len(Category::Command).unwrap(), 200);
    }
}
