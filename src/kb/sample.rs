//! Built-in demo corpus, used when no knowledge file is available.
use serde_json::{Value, json};

/// The demo corpus as a raw JSON document.
#[must_use]
pub fn sample_document() -> Value {
    json!({
        "Q_DAY_001": {
            "question": "一天有多少小时",
            "evidences": {
                "Q_DAY_001#00": {
                    "answer": ["24小时"],
                    "evidence": "地球自转一周的时间约为24小时，这是一天的时间长度来源。"
                }
            }
        },
        "Q_DAY_002": {
            "question": "一年有多少个月",
            "evidences": {
                "Q_DAY_002#00": {
                    "answer": ["12个月"],
                    "evidence": "公历中一年分为12个月，每月天数从28天到31天不等。"
                }
            }
        },
        "Q_DAY_003": {
            "question": "水的沸点是多少摄氏度",
            "evidences": {
                "Q_DAY_003#00": {
                    "answer": ["100摄氏度"],
                    "evidence": "在标准大气压下，纯净水的沸点为100摄氏度，海拔升高沸点会降低。"
                }
            }
        }
    })
}
