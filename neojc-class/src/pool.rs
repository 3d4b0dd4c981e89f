//! Class lookup by internal name.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::class::ClassNode;
use crate::error::{Error, Result};

/// Internal name of the root of every class hierarchy.
pub const OBJECT: &str = "java/lang/Object";

/// Source of class metadata.
pub trait ClassPath {
    /// Look up a class by internal name.
    fn load(&self, name: &str) -> Option<Rc<ClassNode>>;

    /// The class followed by each loadable superclass, nearest first.
    ///
    /// The walk stops at the first superclass that cannot be loaded.
    fn hierarchy(&self, name: &str) -> Vec<Rc<ClassNode>> {
        let mut chain = Vec::new();
        let mut next = self.load(name);
        while let Some(class) = next {
            next = class.super_name.as_deref().and_then(|s| self.load(s));
            chain.push(class);
        }
        chain
    }

    /// Whether `name` is `ancestor` or inherits from it.
    fn is_subclass_of(&self, name: &str, ancestor: &str) -> bool {
        if name == ancestor || ancestor == OBJECT {
            return true;
        }
        let mut current = self.load(name);
        while let Some(class) = current {
            match class.super_name.as_deref() {
                Some(s) if s == ancestor => return true,
                Some(s) => current = self.load(s),
                None => return false,
            }
        }
        false
    }
}

#[derive(Serialize, Deserialize)]
struct PoolFile {
    classes: Vec<ClassNode>,
}

/// In-memory class path.
#[derive(Debug, Default, Clone)]
pub struct ClassPool {
    classes: BTreeMap<String, Rc<ClassNode>>,
}

impl ClassPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: ClassNode) -> Result<Rc<ClassNode>> {
        if self.classes.contains_key(&class.name) {
            return Err(Error::DuplicateClass(class.name));
        }
        let class = Rc::new(class);
        self.classes.insert(class.name.clone(), class.clone());
        Ok(class)
    }

    /// Parse a pool document of the form `classes: [...]`.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: PoolFile = serde_yaml::from_str(text)?;
        let mut pool = ClassPool::new();
        for class in file.classes {
            pool.insert(class)?;
        }
        log::debug!("loaded {} classes", pool.classes.len());
        Ok(pool)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn to_yaml(&self) -> Result<String> {
        let file = PoolFile {
            classes: self.classes.values().map(|c| (**c).clone()).collect(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Rc<ClassNode>> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassPath for ClassPool {
    fn load(&self, name: &str) -> Option<Rc<ClassNode>> {
        self.classes.get(name).cloned()
    }
}
