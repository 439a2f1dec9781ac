//! Service Container - type-keyed registry of shared services.
//!
//! Services are registered under an "interface" type `T` (which may be a
//! trait object such as `dyn Mailer`) and handed out as `Arc<T>`.
//!
//! Lookup order on every resolution:
//! 1. singletons
//! 2. registered instances
//! 3. transient factories (a fresh value per call)

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::errors::{AppError, AppResult};

/// `Arc<T>` erased behind `Any`
type Erased = Arc<dyn Any + Send + Sync>;

type Factory = Arc<dyn Fn(&mut Resolver<'_>) -> AppResult<Erased> + Send + Sync>;

/// Types the container can construct from other registrations.
///
/// Implement this where a constructor would otherwise pull its arguments
/// out of the container by hand.
///
/// # Example
/// ```ignore
/// struct UserService { repo: Arc<dyn UserRepository> }
///
/// impl Injectable for UserService {
///     fn inject(resolver: &mut Resolver<'_>) -> AppResult<Self> {
///         Ok(Self { repo: resolver.get()? })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    fn inject(resolver: &mut Resolver<'_>) -> AppResult<Self>;
}

/// Dependency injection container.
#[derive(Default)]
pub struct Container {
    singletons: RwLock<HashMap<TypeId, Erased>>,
    instances: RwLock<HashMap<TypeId, Erased>>,
    factories: RwLock<HashMap<TypeId, Factory>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance resolved ahead of every other registration.
    pub fn register_singleton<T>(&self, value: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.singletons.write().insert(TypeId::of::<T>(), erase(value));
    }

    /// Register a specific instance.
    pub fn register_instance<T>(&self, value: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.instances.write().insert(TypeId::of::<T>(), erase(value));
    }

    /// Register a transient service; the factory runs on every resolution.
    pub fn register_transient<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut Resolver<'_>) -> AppResult<Arc<T>> + Send + Sync + 'static,
    {
        let factory = boxed_factory(move |resolver| factory(resolver).map(erase));
        self.factories.write().insert(TypeId::of::<T>(), factory);
    }

    /// Register `T` as a transient built through its [`Injectable`] impl.
    pub fn register_injectable<T: Injectable>(&self) {
        self.register_transient::<T, _>(|resolver| T::inject(resolver).map(Arc::new));
    }

    /// Resolve a registered service.
    pub fn get<T>(&self) -> AppResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Resolver::new(self).get::<T>()
    }

    /// Resolve a service, building it through [`Injectable`] when nothing
    /// is registered for it.
    pub fn get_or_build<T: Injectable>(&self) -> AppResult<Arc<T>> {
        Resolver::new(self).get_or_build::<T>()
    }

    /// Whether any registration exists for `T`.
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        let id = TypeId::of::<T>();
        self.singletons.read().contains_key(&id)
            || self.instances.read().contains_key(&id)
            || self.factories.read().contains_key(&id)
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.singletons.write().clear();
        self.instances.write().clear();
        self.factories.write().clear();
    }
}

/// Resolution context passed to factories.
///
/// Tracks the types currently being built so that a factory chain which
/// loops back onto itself fails instead of recursing forever.
pub struct Resolver<'a> {
    container: &'a Container,
    chain: Vec<(TypeId, &'static str)>,
}

impl<'a> Resolver<'a> {
    fn new(container: &'a Container) -> Self {
        Self {
            container,
            chain: Vec::new(),
        }
    }

    /// Resolve a registered service.
    pub fn get<T>(&mut self) -> AppResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.lookup::<T>()?
            .ok_or(AppError::DependencyNotFound(type_name::<T>()))
    }

    /// Resolve a service, falling back to its [`Injectable`] impl.
    pub fn get_or_build<T: Injectable>(&mut self) -> AppResult<Arc<T>> {
        if let Some(found) = self.lookup::<T>()? {
            return Ok(found);
        }

        tracing::debug!(service = type_name::<T>(), "Auto-wiring unregistered service");
        self.build::<T, _>(|resolver| T::inject(resolver).map(Arc::new))
    }

    fn lookup<T>(&mut self) -> AppResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let id = TypeId::of::<T>();

        // Clone out of the registry so no lock is held while a factory runs
        let shared = self
            .container
            .singletons
            .read()
            .get(&id)
            .cloned()
            .or_else(|| self.container.instances.read().get(&id).cloned());
        if let Some(erased) = shared {
            return restore::<T>(erased).map(Some);
        }

        let factory = self.container.factories.read().get(&id).cloned();
        match factory {
            Some(factory) => {
                let erased = self.build::<T, _>(|resolver| factory(resolver))?;
                restore::<T>(erased).map(Some)
            }
            None => Ok(None),
        }
    }

    fn build<T, R>(&mut self, make: impl FnOnce(&mut Self) -> AppResult<R>) -> AppResult<R>
    where
        T: ?Sized + 'static,
    {
        let id = TypeId::of::<T>();
        let name = type_name::<T>();

        if self.chain.iter().any(|(seen, _)| *seen == id) {
            let path = self
                .chain
                .iter()
                .map(|(_, seen)| *seen)
                .chain(std::iter::once(name))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(AppError::CircularDependency(path));
        }

        self.chain.push((id, name));
        let result = make(self);
        self.chain.pop();

        result.map_err(|e| match e {
            AppError::CircularDependency(_) | AppError::AutoWire { .. } => e,
            other => AppError::AutoWire {
                type_name: name,
                source: Box::new(other),
            },
        })
    }
}

fn boxed_factory<F>(factory: F) -> Factory
where
    F: Fn(&mut Resolver<'_>) -> AppResult<Erased> + Send + Sync + 'static,
{
    Arc::new(factory)
}

fn erase<T>(value: Arc<T>) -> Erased
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

fn restore<T>(erased: Erased) -> AppResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    erased
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| AppError::internal(format!("Registration type mismatch for {}", type_name::<T>())))
}

// Process-wide container
static CONTAINER: Lazy<Container> = Lazy::new(Container::new);

/// Get the global container.
pub fn get_container() -> &'static Container {
    &CONTAINER
}

/// Resolve a service from the global container.
pub fn inject<T>() -> AppResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    get_container().get::<T>()
}
