// 排序与搜索的联动规则
//
// 搜索词非空时只能按相关度排序；搜索词为空时恢复为评分降序。
// 这里只做纯计算，写回存储由调用方在写入搜索词之后同步完成。

use crate::models::{SortDirection, SortField, SortIntent};

/// 根据新的搜索词计算排序意图
///
/// 幂等：对同一搜索词重复调用不会产生新的值
pub fn couple(search: &str, current: SortIntent) -> SortIntent {
    if search.is_empty() {
        SortIntent::browse_default()
    } else {
        // 方向保留上一次的显式选择，按相关度排序时下游忽略它
        SortIntent::new(SortField::Relevance, current.direction)
    }
}

/// 用户在排序菜单中点击某个字段
///
/// - 再次点击已选中的字段：有搜索词时回到相关度，否则忽略
/// - 没有搜索词时不能选择相关度
pub fn select_field(search: &str, current: SortIntent, field: SortField) -> SortIntent {
    if field == SortField::Relevance && search.is_empty() {
        return current;
    }
    if field == current.field {
        if search.is_empty() {
            return current;
        }
        return SortIntent::new(SortField::Relevance, current.direction);
    }
    SortIntent::new(field, current.direction)
}

/// 用户在排序菜单中点击方向，按相关度排序时忽略
pub fn select_direction(current: SortIntent, direction: SortDirection) -> SortIntent {
    if !current.direction_applies() {
        return current;
    }
    SortIntent::new(current.field, direction)
}

/// 搜索词与排序意图是否满足联动约束
pub fn is_consistent(search: &str, sort: SortIntent) -> bool {
    if search.is_empty() {
        sort == SortIntent::browse_default()
    } else {
        sort.field == SortField::Relevance
    }
}
