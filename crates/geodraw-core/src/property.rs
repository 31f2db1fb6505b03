//! Named, typed property storage.
//!
//! Every model keeps one [`PropertyContainer`] per element kind (vertices, edges,
//! faces, ...). A container holds any number of dense arrays, each identified by a
//! name such as `"v:point"` and storing one value per element. All arrays of a
//! container always have the same length.
//!
//! Lookups are typed: asking for `"v:color"` as `Vec3` returns `None` both when the
//! property is absent and when it stores something else. Absence is expected and
//! drives the default-fallback branches of the marshallers.

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, Index, IndexMut};

use crate::error::{GeodrawError, Result};
use crate::handle::Handle;

/// Bounds for values storable in a property array.
pub trait PropertyValue: Clone + Send + Sync + 'static {}
impl<T: Clone + Send + Sync + 'static> PropertyValue for T {}

/// Type-erased property array.
trait BaseProperty: Send + Sync {
    fn name(&self) -> &str;
    fn len(&self) -> usize;
    fn resize(&mut self, n: usize);
    fn push(&mut self);
    fn value_type(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_box(&self) -> Box<dyn BaseProperty>;
}

struct PropertyArray<T> {
    name: String,
    data: Vec<T>,
    default: T,
}

impl<T: PropertyValue> BaseProperty for PropertyArray<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn resize(&mut self, n: usize) {
        self.data.resize(n, self.default.clone());
    }

    fn push(&mut self) {
        self.data.push(self.default.clone());
    }

    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn BaseProperty> {
        Box::new(PropertyArray {
            name: self.name.clone(),
            data: self.data.clone(),
            default: self.default.clone(),
        })
    }
}

/// A collection of equally sized, named property arrays.
#[derive(Default)]
pub struct PropertyContainer {
    properties: Vec<Box<dyn BaseProperty>>,
    size: usize,
}

impl PropertyContainer {
    /// Creates an empty container with zero elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements (the length of every array).
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the container holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of properties.
    pub fn num_properties(&self) -> usize {
        self.properties.len()
    }

    /// Returns the names of all properties in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name())
    }

    /// Returns true if a property with this name exists, whatever its type.
    pub fn exists(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Adds a new property filled with `default`.
    ///
    /// Fails if a property with the same name already exists.
    pub fn add<T: PropertyValue>(&mut self, name: &str, default: T) -> Result<&mut [T]> {
        if self.exists(name) {
            return Err(GeodrawError::PropertyExists(name.to_string()));
        }
        self.properties.push(Box::new(PropertyArray {
            name: name.to_string(),
            data: vec![default.clone(); self.size],
            default,
        }));
        let last = self.properties.len() - 1;
        Ok(self.data_mut_at::<T>(last).unwrap_or_default())
    }

    /// Returns the values of a property, or `None` if it is absent or of another type.
    pub fn get<T: PropertyValue>(&self, name: &str) -> Option<&[T]> {
        let idx = self.position(name)?;
        self.properties[idx]
            .as_any()
            .downcast_ref::<PropertyArray<T>>()
            .map(|p| p.data.as_slice())
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut<T: PropertyValue>(&mut self, name: &str) -> Option<&mut [T]> {
        let idx = self.position(name)?;
        self.data_mut_at::<T>(idx)
    }

    /// Returns an existing property or adds one filled with `default`.
    ///
    /// Fails if the name is taken by a property of another type.
    pub fn get_or_add<T: PropertyValue>(&mut self, name: &str, default: T) -> Result<&mut [T]> {
        match self.position(name) {
            Some(idx) => self
                .data_mut_at::<T>(idx)
                .ok_or_else(|| GeodrawError::PropertyTypeMismatch {
                    name: name.to_string(),
                    expected: type_name::<T>(),
                }),
            None => self.add(name, default),
        }
    }

    /// Replaces (or creates) a property with the given values.
    ///
    /// The number of values must match the number of elements.
    pub fn set<T: PropertyValue + Default>(&mut self, name: &str, values: Vec<T>) -> Result<()> {
        if values.len() != self.size {
            return Err(GeodrawError::SizeMismatch {
                expected: self.size,
                actual: values.len(),
            });
        }
        self.remove(name);
        self.properties.push(Box::new(PropertyArray {
            name: name.to_string(),
            data: values,
            default: T::default(),
        }));
        Ok(())
    }

    /// Removes a property. Returns false if it did not exist.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.properties.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns the Rust type name stored by a property.
    pub fn value_type(&self, name: &str) -> Option<&'static str> {
        self.position(name).map(|idx| self.properties[idx].value_type())
    }

    /// Appends one element to every array, using each array's default value.
    pub fn push(&mut self) {
        for p in &mut self.properties {
            p.push();
        }
        self.size += 1;
    }

    /// Resizes every array to `n` elements.
    pub fn resize(&mut self, n: usize) {
        for p in &mut self.properties {
            p.resize(n);
        }
        self.size = n;
    }

    /// Removes all properties and elements.
    pub fn clear(&mut self) {
        self.properties.clear();
        self.size = 0;
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }

    fn data_mut_at<T: PropertyValue>(&mut self, idx: usize) -> Option<&mut [T]> {
        self.properties[idx]
            .as_any_mut()
            .downcast_mut::<PropertyArray<T>>()
            .map(|p| p.data.as_mut_slice())
    }
}

impl Clone for PropertyContainer {
    fn clone(&self) -> Self {
        Self {
            properties: self.properties.iter().map(|p| p.clone_box()).collect(),
            size: self.size,
        }
    }
}

impl fmt::Debug for PropertyContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyContainer")
            .field("size", &self.size)
            .field("properties", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Read-only typed view of a property, indexable by element handle.
pub struct PropertyRef<'a, H, T> {
    data: &'a [T],
    _handle: PhantomData<H>,
}

impl<'a, H: Handle, T> PropertyRef<'a, H, T> {
    /// Wraps a property slice.
    pub fn new(data: &'a [T]) -> Self {
        Self {
            data,
            _handle: PhantomData,
        }
    }

    /// Returns the value for `handle`, or `None` if out of range.
    pub fn get(&self, handle: H) -> Option<&'a T> {
        self.data.get(handle.idx())
    }

    /// Returns the underlying dense array.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

impl<H, T> Clone for PropertyRef<'_, H, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H, T> Copy for PropertyRef<'_, H, T> {}

impl<H: Handle, T> Index<H> for PropertyRef<'_, H, T> {
    type Output = T;

    fn index(&self, handle: H) -> &T {
        &self.data[handle.idx()]
    }
}

impl<H, T> Deref for PropertyRef<'_, H, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.data
    }
}

/// Mutable typed view of a property, indexable by element handle.
pub struct PropertyMut<'a, H, T> {
    data: &'a mut [T],
    _handle: PhantomData<H>,
}

impl<'a, H: Handle, T> PropertyMut<'a, H, T> {
    /// Wraps a mutable property slice.
    pub fn new(data: &'a mut [T]) -> Self {
        Self {
            data,
            _handle: PhantomData,
        }
    }

    /// Returns the underlying dense array.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data
    }
}

impl<H: Handle, T> Index<H> for PropertyMut<'_, H, T> {
    type Output = T;

    fn index(&self, handle: H) -> &T {
        &self.data[handle.idx()]
    }
}

impl<H: Handle, T> IndexMut<H> for PropertyMut<'_, H, T> {
    fn index_mut(&mut self, handle: H) -> &mut T {
        &mut self.data[handle.idx()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Vertex;
    use glam::Vec3;

    fn container_with(n: usize) -> PropertyContainer {
        let mut c = PropertyContainer::new();
        c.resize(n);
        c
    }

    #[test]
    fn test_add_and_get() {
        let mut c = container_with(3);
        c.add("v:color", Vec3::ONE).unwrap();
        let colors = c.get::<Vec3>("v:color").unwrap();
        assert_eq!(colors, &[Vec3::ONE; 3]);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut c = container_with(1);
        c.add("v:index", 0_i32).unwrap();
        assert!(matches!(
            c.add("v:index", 1_i32),
            Err(GeodrawError::PropertyExists(_))
        ));
    }

    #[test]
    fn test_typed_lookup_misses_other_types() {
        let mut c = container_with(2);
        c.add("v:primitive_type", -1_i32).unwrap();
        assert!(c.get::<Vec3>("v:primitive_type").is_none());
        assert!(c.get::<i32>("v:primitive_type").is_some());
        assert!(c.get::<i32>("v:missing").is_none());
    }

    #[test]
    fn test_get_or_add_type_mismatch() {
        let mut c = container_with(2);
        c.add("f:label", 0_u8).unwrap();
        assert!(matches!(
            c.get_or_add("f:label", 0.0_f32),
            Err(GeodrawError::PropertyTypeMismatch { .. })
        ));
        assert_eq!(c.get_or_add("f:label", 9_u8).unwrap(), &[0, 0]);
    }

    #[test]
    fn test_push_grows_all_arrays() {
        let mut c = container_with(1);
        c.add("a", 1_i32).unwrap();
        c.add("b", Vec3::Z).unwrap();
        c.push();
        assert_eq!(c.len(), 2);
        assert_eq!(c.get::<i32>("a").unwrap(), &[1, 1]);
        assert_eq!(c.get::<Vec3>("b").unwrap().len(), 2);
    }

    #[test]
    fn test_set_checks_size() {
        let mut c = container_with(2);
        assert!(matches!(
            c.set("v:point", vec![Vec3::ZERO]),
            Err(GeodrawError::SizeMismatch {
                expected: 2,
                actual: 1
            })
        ));
        c.set("v:point", vec![Vec3::X, Vec3::Y]).unwrap();
        assert_eq!(c.get::<Vec3>("v:point").unwrap()[1], Vec3::Y);
    }

    #[test]
    fn test_remove() {
        let mut c = container_with(1);
        c.add("x", 0_u32).unwrap();
        assert!(c.remove("x"));
        assert!(!c.remove("x"));
        assert!(!c.exists("x"));
    }

    #[test]
    fn test_property_ref_indexing() {
        let data = [Vec3::X, Vec3::Y];
        let prop: PropertyRef<'_, Vertex, Vec3> = PropertyRef::new(&data);
        assert_eq!(prop[Vertex::new(1)], Vec3::Y);
        assert!(prop.get(Vertex::new(2)).is_none());
        assert_eq!(prop.len(), 2);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut c = container_with(1);
        c.add("a", 1_i32).unwrap();
        let copy = c.clone();
        c.get_mut::<i32>("a").unwrap()[0] = 5;
        assert_eq!(copy.get::<i32>("a").unwrap(), &[1]);
    }
}
