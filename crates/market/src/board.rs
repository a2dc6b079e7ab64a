use pulse_core::common::SymbolList;
use pulse_core::config::{BoardConfig, ConfigError, validate_boards};
use std::sync::Arc;

/// # Summary
/// 看板：一组有名称、有标题的证券列表。
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub name: String,
    pub title: String,
    pub symbols: SymbolList,
}

/// # Summary
/// 看板注册表，启动时由配置构建，运行期只读。
///
/// # Invariants
/// - 至少包含一个看板，名称唯一。
/// - 第一个看板为默认看板 (`/` 路由)。
#[derive(Debug, Clone)]
pub struct BoardRegistry {
    boards: Vec<Arc<Board>>,
}

impl BoardRegistry {
    /// # Summary
    /// 校验并构建注册表。
    ///
    /// # Returns
    /// 配置非法时返回 `ConfigError`。
    pub fn from_config(configs: &[BoardConfig]) -> Result<Self, ConfigError> {
        validate_boards(configs)?;
        let boards = configs
            .iter()
            .map(|c| {
                Arc::new(Board {
                    name: c.name.clone(),
                    title: c.title.clone(),
                    symbols: c.symbols.clone(),
                })
            })
            .collect();
        Ok(Self { boards })
    }

    pub fn get(&self, name: &str) -> Option<Arc<Board>> {
        self.boards.iter().find(|b| b.name == name).cloned()
    }

    pub fn default_board(&self) -> Option<Arc<Board>> {
        self.boards.first().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Board>> {
        self.boards.iter()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}
