//! Runtime registration table mapping stage names to factories.
use crate::error::{Error, Result};
use crate::stage::{
    BlobsAndNoodles, DensityRandom, Fencifier, HolePuncher, NoDiagonals, Propertifier, RandomFill,
    SetBlend, SetSymmetry, Stage,
};

type StageFactory = Box<dyn Fn() -> Box<dyn Stage> + Send + Sync>;

/// Insertion-ordered table of stage factories.
///
/// The registry avoids global state: a pipeline owns its own table and presets
/// resolve names against it at apply time.
#[derive(Default)]
pub struct StageRegistry {
    factories: Vec<(&'static str, StageFactory)>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in stage library.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("random", || Box::new(RandomFill));
        registry.register("setsymmetry", || Box::new(SetSymmetry));
        registry.register("setblend", || Box::new(SetBlend));
        registry.register("densityrandom", || Box::new(DensityRandom));
        registry.register("nodiagonals", || Box::new(NoDiagonals));
        registry.register("holepuncher", || Box::new(HolePuncher));
        registry.register("fencifier", || Box::new(Fencifier));
        registry.register("blobsandnoodles", || Box::new(BlobsAndNoodles));
        registry.register("propertifier", || Box::new(Propertifier));
        registry
    }

    /// Registers a factory under `name`, replacing any previous registration.
    pub fn register(
        &mut self,
        name: &'static str,
        factory: impl Fn() -> Box<dyn Stage> + Send + Sync + 'static,
    ) {
        self.factories.retain(|(n, _)| *n != name);
        self.factories.push((name, Box::new(factory)));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.iter().any(|(n, _)| *n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(|(n, _)| *n)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Stage>> {
        self.factories
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| Error::UnknownStage {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_cover_the_stage_library() {
        let registry = StageRegistry::with_builtins();
        for name in [
            "random",
            "setsymmetry",
            "setblend",
            "densityrandom",
            "nodiagonals",
            "holepuncher",
            "fencifier",
            "blobsandnoodles",
            "propertifier",
        ] {
            let stage = registry.create(name).expect("builtin stage");
            assert_eq!(stage.name(), name);
        }
    }

    #[test]
    fn unknown_names_fail_with_a_dedicated_error() {
        let registry = StageRegistry::with_builtins();
        assert!(matches!(
            registry.create("carve"),
            Err(Error::UnknownStage { ref name }) if name == "carve"
        ));
    }

    #[test]
    fn registration_replaces_previous_entries() {
        let mut registry = StageRegistry::new();
        registry.register("random", || Box::new(RandomFill));
        registry.register("random", || Box::new(RandomFill));
        assert_eq!(registry.names().count(), 1);
    }
}
