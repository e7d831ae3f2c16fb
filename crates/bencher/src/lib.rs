//! JSON body fixtures shared by the serializer benchmarks.
//!
//! Fixtures are grouped by [`PayloadSize`] so every benchmark group reports small and large
//! bodies separately.

/// Size class of a body fixture, used as the benchmark group suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadSize {
    Small,
    Large,
}

impl PayloadSize {
    pub const ALL: [PayloadSize; 2] = [PayloadSize::Small, PayloadSize::Large];

    pub fn label(self) -> &'static str {
        match self {
            PayloadSize::Small => "small",
            PayloadSize::Large => "large",
        }
    }

    /// Names a benchmark group after `prefix` and this size class, e.g. `jsonp/large`.
    pub fn group_name(self, prefix: &str) -> String {
        format!("{prefix}/{}", self.label())
    }
}

/// A JSON document a handler would send as the response body.
#[derive(Debug, Copy, Clone)]
pub struct BodyFixture {
    name: &'static str,
    size: PayloadSize,
    json: &'static str,
}

impl BodyFixture {
    pub const fn new(name: &'static str, size: PayloadSize, json: &'static str) -> Self {
        Self { name, size, json }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> PayloadSize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.json.len()
    }

    pub fn is_empty(&self) -> bool {
        self.json.is_empty()
    }

    /// Parses the fixture into the value a handler would send.
    pub fn value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(self.json)
    }
}

/// Returns the fixtures of `size` among `fixtures`.
pub fn of_size(fixtures: &[BodyFixture], size: PayloadSize) -> impl Iterator<Item = &BodyFixture> {
    fixtures.iter().filter(move |fixture| fixture.size() == size)
}
