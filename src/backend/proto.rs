//! Wire types for the two inference service contracts.
//!
//! The schemas are fixed, so the messages are written out by hand instead of
//! being generated from proto files at build time. Field numbering follows
//! the service definitions; the nested reply wrappers mirror the paths the
//! translator reads (`body.message_wrapper.message.message` for the GPT
//! family, `args.args.args.message` for the Vertex family).

// ── GPT family ──────────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct GptRequest {
    #[prost(string, tag = "1")]
    pub models: String,
    #[prost(message, repeated, tag = "2")]
    pub messages: Vec<GptMessage>,
    #[prost(double, tag = "3")]
    pub temperature: f64,
    #[prost(double, tag = "4")]
    pub top_p: f64,
}

/// `role` is a wire code: 0 carries the system rules, 1 the conversation.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GptMessage {
    #[prost(int32, tag = "1")]
    pub role: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GptReply {
    #[prost(int32, tag = "1")]
    pub response_code: i32,
    #[prost(message, optional, tag = "2")]
    pub body: Option<GptReplyBody>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GptReplyBody {
    #[prost(message, optional, tag = "1")]
    pub message_wrapper: Option<GptMessageWrapper>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GptMessageWrapper {
    #[prost(message, optional, tag = "1")]
    pub message: Option<GptInnerMessage>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GptInnerMessage {
    #[prost(string, tag = "1")]
    pub message: String,
}

// ── Vertex family ───────────────────────────────────────────

#[derive(Clone, PartialEq, prost::Message)]
pub struct VertexRequest {
    #[prost(string, tag = "1")]
    pub models: String,
    #[prost(message, optional, tag = "2")]
    pub args: Option<VertexArgs>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VertexArgs {
    #[prost(message, optional, tag = "1")]
    pub messages: Option<VertexMessages>,
    #[prost(string, tag = "2")]
    pub rules: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VertexMessages {
    /// Fixed discriminant the service expects; always 1.
    #[prost(int32, tag = "1")]
    pub unknown: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VertexReply {
    #[prost(int32, tag = "1")]
    pub response_code: i32,
    #[prost(message, optional, tag = "2")]
    pub args: Option<VertexReplyArgs>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VertexReplyArgs {
    #[prost(message, optional, tag = "1")]
    pub args: Option<VertexReplyInner>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VertexReplyInner {
    #[prost(message, optional, tag = "1")]
    pub args: Option<VertexReplyMessage>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VertexReplyMessage {
    #[prost(string, tag = "1")]
    pub message: String,
}
