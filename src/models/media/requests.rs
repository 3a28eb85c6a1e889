use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/media.ts")]
pub struct MediaProxyQuery {
    pub url: String,
}
