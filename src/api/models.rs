use axum::Json;
use serde_json::json;

/// The public aliases the gateway advertises. The list is static; model
/// routing itself accepts anything and is not limited to these names.
const PUBLIC_MODELS: &[&str] = &[
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
    "claude-3-sonnet@20240229",
    "claude-3-opus@20240229",
    "claude-3-haiku@20240307",
    "claude-3-5-sonnet@20240620",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "chat-bison",
    "codechat-bison",
];

pub async fn list_models() -> Json<serde_json::Value> {
    let data: Vec<_> = PUBLIC_MODELS
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "object": "model",
                "owned_by": "pieces-os",
            })
        })
        .collect();

    Json(json!({ "object": "list", "data": data }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_every_public_alias() {
        let Json(body) = list_models().await;
        assert_eq!(body["object"], "list");
        assert_eq!(body["data"].as_array().unwrap().len(), PUBLIC_MODELS.len());
        assert_eq!(body["data"][0]["owned_by"], "pieces-os");
    }
}
