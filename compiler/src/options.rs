use crate::entities::Direction;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Options shared by every compile hook of a run.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Compile publish operations as visible.
    pub publish: bool,
    /// Compile subscribe operations as visible.
    pub subscribe: bool,
    /// Content type used when neither the message nor the document
    /// declares one.
    pub default_content_type: String,
    /// Protocols to build. `None` enables every built-in protocol.
    pub protocols: Option<Vec<String>>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            publish: true,
            subscribe: true,
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            protocols: None,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directions(mut self, publish: bool, subscribe: bool) -> Self {
        self.publish = publish;
        self.subscribe = subscribe;
        self
    }

    pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = content_type.into();
        self
    }

    pub fn with_protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocols = Some(protocols.into_iter().map(Into::into).collect());
        self
    }

    pub fn direction_enabled(&self, direction: Direction) -> bool {
        match direction {
            Direction::Publish => self.publish,
            Direction::Subscribe => self.subscribe,
        }
    }
}
