//! Modules, class constructors and objects

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{Method, Value};

/// An imported module: its name and exported bindings.
pub struct Module {
    /// Module name as imported
    pub name: String,

    /// Bindings the module exported
    pub exports: IndexMap<String, Value>,
}

/// An evaluated class definition.
pub struct Constructor {
    /// Class name
    pub name: String,

    /// Members harvested from the class body
    pub members: IndexMap<String, Value>,

    /// All ancestors, root first, excluding this class
    pub ancestors: Vec<Rc<Constructor>>,
}

impl Constructor {
    /// Create a constructor, resolving its ancestor chain once.
    pub fn new(
        name: impl Into<String>,
        members: IndexMap<String, Value>,
        parent: Option<Rc<Constructor>>,
    ) -> Self {
        let ancestors = match parent {
            Some(p) => {
                let mut chain = p.ancestors.clone();
                chain.push(p);
                chain
            }
            None => Vec::new(),
        };

        Self {
            name: name.into(),
            members,
            ancestors,
        }
    }

    /// Attribute map of a fresh instance: members folded root to child, so
    /// a child's members override its ancestors'.
    pub fn instance_attributes(&self) -> IndexMap<String, Value> {
        let mut attributes = IndexMap::new();
        for ancestor in &self.ancestors {
            for (name, value) in &ancestor.members {
                attributes.insert(name.clone(), value.clone());
            }
        }
        for (name, value) in &self.members {
            attributes.insert(name.clone(), value.clone());
        }
        attributes
    }
}

/// An instance of a class.
pub struct Object {
    /// The class this object was built from
    pub constructor: Rc<Constructor>,

    /// Flat attribute map, shared by every reference to the object
    pub attributes: RefCell<IndexMap<String, Value>>,
}

impl Object {
    /// Instantiate a constructor without running `__init__`.
    pub fn new(constructor: Rc<Constructor>) -> Rc<Self> {
        let attributes = RefCell::new(constructor.instance_attributes());
        Rc::new(Self {
            constructor,
            attributes,
        })
    }

    /// Read an attribute; functions come back bound to this object.
    pub fn get(self: &Rc<Self>, name: &str) -> Option<Value> {
        let value = self.attributes.borrow().get(name).cloned()?;
        Some(bind(self, value))
    }

    /// Set an attribute.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.attributes.borrow_mut().insert(name.into(), value);
    }
}

fn bind(receiver: &Rc<Object>, value: Value) -> Value {
    match value {
        Value::Function(function) => Value::Method(Rc::new(Method {
            function,
            receiver: Rc::clone(receiver),
        })),
        other => other,
    }
}

impl Value {
    /// Attributes visible through `value.name`: object attributes (functions
    /// bound), module exports, or class members. Other values have none.
    pub fn attribute_table(&self) -> IndexMap<String, Value> {
        match self {
            Value::Object(object) => object
                .attributes
                .borrow()
                .iter()
                .map(|(name, value)| (name.clone(), bind(object, value.clone())))
                .collect(),
            Value::Module(module) => module.exports.clone(),
            Value::Constructor(constructor) => constructor.instance_attributes(),
            _ => IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, members: &[(&str, i64)], parent: Option<Rc<Constructor>>) -> Rc<Constructor> {
        let members = members
            .iter()
            .map(|(n, v)| (n.to_string(), Value::Int(*v)))
            .collect();
        Rc::new(Constructor::new(name, members, parent))
    }

    #[test]
    fn test_ancestors_are_root_first() {
        let a = class("A", &[], None);
        let b = class("B", &[], Some(Rc::clone(&a)));
        let c = class("C", &[], Some(Rc::clone(&b)));

        let names: Vec<&str> = c.ancestors.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(Rc::ptr_eq(&c.ancestors[1], &b));
        assert!(a.ancestors.is_empty());
    }

    #[test]
    fn test_child_members_override_parent() {
        let a = class("A", &[("f", 1), ("g", 10)], None);
        let b = class("B", &[("f", 2)], Some(a));

        let attrs = b.instance_attributes();
        assert_eq!(attrs.get("f"), Some(&Value::Int(2)));
        assert_eq!(attrs.get("g"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_object_attributes_are_shared() {
        let a = class("A", &[("x", 1)], None);
        let object = Object::new(a);
        let alias = Value::Object(Rc::clone(&object));

        object.set("x", Value::Int(5));
        assert_eq!(alias.attribute_table().get("x"), Some(&Value::Int(5)));
    }
}
