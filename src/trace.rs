pub(crate) mod warmup;

pub(crate) const WARMUP_TRACING_EVENT_TARGET: &str = "pool_warmup::warmup";

pub(crate) trait TracingRepresentation {
    type Representation;

    fn tracing_representation(&self) -> Self::Representation;
}

impl TracingRepresentation for crate::error::Error {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        self.to_string()
    }
}

impl TracingRepresentation for crate::warmup::FailureRecord {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        self.to_string()
    }
}
