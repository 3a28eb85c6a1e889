use serde::Deserialize;
use ts_rs::TS;

// 聚合请求：为某学期的所有在读注册重算成绩单
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ComputeResultsRequest {
    /// 为空时对学期内全部注册重算
    #[serde(default)]
    pub enrollment_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultListQuery {
    /// 按评审决定过滤：ADM、AJ、RAT、EXC
    pub decision: Option<String>,
}
