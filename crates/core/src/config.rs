use crate::common::SymbolList;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub collector: CollectorConfig,
    pub dashboard: DashboardConfig,
    pub boards: Vec<BoardConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 行情源 (Yahoo Finance) 连接参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// 批量采集参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    // 每个证券请求的交易日数量
    pub sessions: usize,
    // 同时在途的行情请求上限，1 表示顺序执行
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_interval_secs: u64,
}

/// 单个看板的配置：名称即 URL 路径段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub title: String,
    pub symbols: SymbolList,
}

/// 配置校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no boards configured")]
    NoBoards,
    #[error("invalid board name {0:?}: use letters, digits, '-' or '_'")]
    InvalidBoardName(String),
    #[error("duplicate board name {0:?}")]
    DuplicateBoard(String),
    #[error("board {0:?} has an empty title")]
    EmptyTitle(String),
    #[error("board {0:?} contains a blank symbol")]
    BlankSymbol(String),
    #[error("{field} must be at least {min}")]
    OutOfRange { field: &'static str, min: u64 },
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            feed: FeedConfig::default(),
            collector: CollectorConfig::default(),
            dashboard: DashboardConfig::default(),
            boards: default_boards(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            sessions: 5,
            concurrency: 1,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 10,
        }
    }
}

/// 内置的两个看板：银行板块与大盘指数成分股
pub fn default_boards() -> Vec<BoardConfig> {
    vec![
        BoardConfig {
            name: "banknifty".to_string(),
            title: "Bank Nifty Stock Analysis".to_string(),
            symbols: SymbolList::new([
                "HDFCBANK.NS", "ICICIBANK.NS", "SBIN.NS", "KOTAKBANK.NS", "AXISBANK.NS",
                "BANKBARODA.NS", "PNB.NS", "CANBK.NS", "INDUSINDBK.NS", "FEDERALBNK.NS",
                "AUBANK.NS", "IDFCFIRSTB.NS",
            ]),
        },
        BoardConfig {
            name: "nifty50".to_string(),
            title: "Nifty50 Stock Analysis".to_string(),
            symbols: SymbolList::new([
                "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "BHARTIARTL.NS", "ICICIBANK.NS",
                "INFY.NS", "SBIN.NS", "ITC.NS", "HINDUNILVR.NS", "LT.NS", "HCLTECH.NS",
                "SUNPHARMA.NS", "BAJFINANCE.NS", "M&M.NS", "NTPC.NS", "KOTAKBANK.NS",
                "AXISBANK.NS", "MARUTI.NS", "ULTRACEMCO.NS", "ONGC.NS", "WIPRO.NS",
                "TITAN.NS", "POWERGRID.NS", "TATAMOTORS.NS", "ADANIENT.NS", "ADANIPORTS.NS",
                "BAJAJFINSV.NS", "COALINDIA.NS", "BAJAJ-AUTO.NS", "JSWSTEEL.NS", "TRENT.NS",
                "BEL.NS", "ASIANPAINT.NS", "NESTLEIND.NS", "TATASTEEL.NS", "GRASIM.NS",
                "TECHM.NS", "HINDALCO.NS", "SBILIFE.NS", "HDFCLIFE.NS", "EICHERMOT.NS",
                "BPCL.NS", "SHRIRAMFIN.NS", "CIPLA.NS", "BRITANNIA.NS", "APOLLOHOSP.NS",
                "DRREDDY.NS", "HEROMOTOCO.NS", "TATACONSUM.NS", "INDUSINDBK.NS",
            ]),
        },
    ]
}

impl AppConfig {
    /// # Summary
    /// 在装配组件之前校验配置。
    ///
    /// # Logic
    /// 1. 数值参数必须处于可用范围。
    /// 2. 至少配置一个看板。
    /// 3. 看板名称必须合法且唯一，标题与证券代码不能为空。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "feed.timeout_secs",
                min: 1,
            });
        }
        if self.collector.sessions < 2 {
            return Err(ConfigError::OutOfRange {
                field: "collector.sessions",
                min: 2,
            });
        }
        if self.collector.concurrency == 0 {
            return Err(ConfigError::OutOfRange {
                field: "collector.concurrency",
                min: 1,
            });
        }
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "dashboard.refresh_interval_secs",
                min: 1,
            });
        }
        validate_boards(&self.boards)
    }
}

/// 校验看板列表，`BoardRegistry` 构建时同样调用
pub fn validate_boards(boards: &[BoardConfig]) -> Result<(), ConfigError> {
    if boards.is_empty() {
        return Err(ConfigError::NoBoards);
    }

    let mut seen = HashSet::new();
    for board in boards {
        if !is_valid_board_name(&board.name) {
            return Err(ConfigError::InvalidBoardName(board.name.clone()));
        }
        if !seen.insert(board.name.as_str()) {
            return Err(ConfigError::DuplicateBoard(board.name.clone()));
        }
        if board.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle(board.name.clone()));
        }
        if board.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::BlankSymbol(board.name.clone()));
        }
    }
    Ok(())
}

fn is_valid_board_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
