//! The adapter registry shipped with the binary.

use flowmodel_core::adapter::AdapterRegistry;
use flowmodel_python::PythonAdapter;
use flowmodel_ruby::RubyAdapter;
use flowmodel_static::StaticAdapter;

/// Registry with an adapter for every supported ecosystem.
pub fn default_registry() -> AdapterRegistry {
    AdapterRegistry::new()
        .with(StaticAdapter::java())
        .with(StaticAdapter::csharp())
        .with(PythonAdapter::new())
        .with(RubyAdapter::new())
}
