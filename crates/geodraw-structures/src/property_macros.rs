//! Typed property accessors generated per element kind.

/// Generates the typed accessors for one property container of a model.
macro_rules! property_accessors {
    (
        $handle:ty, $field:ident,
        get: $get:ident,
        get_mut: $get_mut:ident,
        add: $add:ident,
        get_or_add: $get_or_add:ident,
        set: $set:ident,
        remove: $remove:ident,
        has: $has:ident,
        container: $container:ident $(,)?
    ) => {
        /// Returns a typed view of the property, or `None` if absent or of another type.
        pub fn $get<T: geodraw_core::property::PropertyValue>(
            &self,
            name: &str,
        ) -> Option<geodraw_core::PropertyRef<'_, $handle, T>> {
            self.$field.get::<T>(name).map(geodraw_core::PropertyRef::new)
        }

        /// Returns a mutable typed view of the property.
        pub fn $get_mut<T: geodraw_core::property::PropertyValue>(
            &mut self,
            name: &str,
        ) -> Option<geodraw_core::property::PropertyMut<'_, $handle, T>> {
            self.$field
                .get_mut::<T>(name)
                .map(geodraw_core::property::PropertyMut::new)
        }

        /// Adds a property filled with `default`. Fails if the name is taken.
        pub fn $add<T: geodraw_core::property::PropertyValue>(
            &mut self,
            name: &str,
            default: T,
        ) -> geodraw_core::Result<geodraw_core::property::PropertyMut<'_, $handle, T>> {
            self.$field
                .add(name, default)
                .map(geodraw_core::property::PropertyMut::new)
        }

        /// Returns the property, adding it filled with `default` if absent.
        pub fn $get_or_add<T: geodraw_core::property::PropertyValue>(
            &mut self,
            name: &str,
            default: T,
        ) -> geodraw_core::Result<geodraw_core::property::PropertyMut<'_, $handle, T>> {
            self.$field
                .get_or_add(name, default)
                .map(geodraw_core::property::PropertyMut::new)
        }

        /// Replaces (or creates) the property with one value per element.
        pub fn $set<T: geodraw_core::property::PropertyValue + Default>(
            &mut self,
            name: &str,
            values: Vec<T>,
        ) -> geodraw_core::Result<()> {
            self.$field.set(name, values)
        }

        /// Removes the property. Returns false if it did not exist.
        pub fn $remove(&mut self, name: &str) -> bool {
            self.$field.remove(name)
        }

        /// Returns true if a property with this name exists, whatever its type.
        pub fn $has(&self, name: &str) -> bool {
            self.$field.exists(name)
        }

        /// Returns the underlying property container.
        pub fn $container(&self) -> &geodraw_core::PropertyContainer {
            &self.$field
        }
    };
}
