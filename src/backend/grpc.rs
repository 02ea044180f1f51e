//! gRPC client for the two inference services.
//!
//! One lazily-connected TLS channel per family; calls are issued through
//! `tonic::client::Grpc` with a prost codec against the fixed method paths,
//! so no generated client code is involved. Connection failures surface
//! per-call as [`BackendError::Transport`] and feed the retry loop.

use futures::StreamExt;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::debug;

use async_trait::async_trait;

use super::{proto, BackendError, BackendReply, InferenceBackend, ReplyStream};
use crate::config::Config;
use crate::proxy::selector::{BackendRequest, RoutedRequest};

const GPT_PREDICT: &str =
    "/runtime.aot.machine_learning.parents.gpt.GPTInferenceService/Predict";
const GPT_PREDICT_WITH_STREAM: &str =
    "/runtime.aot.machine_learning.parents.gpt.GPTInferenceService/PredictWithStream";
const VERTEX_PREDICT: &str =
    "/runtime.aot.machine_learning.parents.vertex.VertexInferenceService/Predict";
const VERTEX_PREDICT_WITH_STREAM: &str =
    "/runtime.aot.machine_learning.parents.vertex.VertexInferenceService/PredictWithStream";

pub struct GrpcBackend {
    gpt: Channel,
    vertex: Channel,
}

impl GrpcBackend {
    /// Build the two channels from the configured hosts. Channels connect
    /// lazily, so this never blocks on the network; dial failures show up
    /// on the first call.
    pub fn connect(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            gpt: open_channel(&config.gpt_grpc)?,
            vertex: open_channel(&config.common_grpc)?,
        })
    }
}

fn open_channel(host: &str) -> anyhow::Result<Channel> {
    let endpoint = Endpoint::from_shared(format!("https://{host}"))?
        .tls_config(ClientTlsConfig::new().with_native_roots())?;
    Ok(endpoint.connect_lazy())
}

async fn unary<Req, Rep>(
    channel: &Channel,
    path: &'static str,
    request: Req,
) -> Result<Rep, BackendError>
where
    Req: prost::Message + Send + 'static,
    Rep: prost::Message + Default + Send + 'static,
{
    let mut grpc = Grpc::new(channel.clone());
    grpc.ready()
        .await
        .map_err(|e| BackendError::Transport(format!("service not ready: {e}")))?;

    let codec: ProstCodec<Req, Rep> = ProstCodec::default();
    let response = grpc
        .unary(
            tonic::Request::new(request),
            PathAndQuery::from_static(path),
            codec,
        )
        .await?;
    Ok(response.into_inner())
}

async fn server_streaming<Req, Rep>(
    channel: &Channel,
    path: &'static str,
    request: Req,
) -> Result<tonic::codec::Streaming<Rep>, BackendError>
where
    Req: prost::Message + Send + 'static,
    Rep: prost::Message + Default + Send + 'static,
{
    let mut grpc = Grpc::new(channel.clone());
    grpc.ready()
        .await
        .map_err(|e| BackendError::Transport(format!("service not ready: {e}")))?;

    let codec: ProstCodec<Req, Rep> = ProstCodec::default();
    let response = grpc
        .server_streaming(
            tonic::Request::new(request),
            PathAndQuery::from_static(path),
            codec,
        )
        .await?;
    Ok(response.into_inner())
}

#[async_trait]
impl InferenceBackend for GrpcBackend {
    async fn predict(&self, routed: &RoutedRequest) -> Result<BackendReply, BackendError> {
        debug!(family = %routed.family, endpoint = %routed.endpoint, "unary predict");
        match &routed.request {
            BackendRequest::Gpt(req) => {
                unary::<proto::GptRequest, proto::GptReply>(&self.gpt, GPT_PREDICT, req.clone())
                    .await
                    .map(BackendReply::Gpt)
            }
            BackendRequest::Vertex(req) => unary::<proto::VertexRequest, proto::VertexReply>(
                &self.vertex,
                VERTEX_PREDICT,
                req.clone(),
            )
            .await
            .map(BackendReply::Vertex),
        }
    }

    async fn predict_with_stream(
        &self,
        routed: &RoutedRequest,
    ) -> Result<ReplyStream, BackendError> {
        debug!(family = %routed.family, endpoint = %routed.endpoint, "streaming predict");
        match &routed.request {
            BackendRequest::Gpt(req) => {
                let replies = server_streaming::<proto::GptRequest, proto::GptReply>(
                    &self.gpt,
                    GPT_PREDICT_WITH_STREAM,
                    req.clone(),
                )
                .await?;
                Ok(Box::pin(replies.map(|item| {
                    item.map(BackendReply::Gpt).map_err(BackendError::from)
                })))
            }
            BackendRequest::Vertex(req) => {
                let replies = server_streaming::<proto::VertexRequest, proto::VertexReply>(
                    &self.vertex,
                    VERTEX_PREDICT_WITH_STREAM,
                    req.clone(),
                )
                .await?;
                Ok(Box::pin(replies.map(|item| {
                    item.map(BackendReply::Vertex).map_err(BackendError::from)
                })))
            }
        }
    }
}
