//! 状态容器
//!
//! 列表、弹窗和会话的状态机在浏览器中放在响应式信号里，而信号不能跨 `.await` 借用。
//! 异步流程因此每一步都经由 `StateCell` 重新借用一次状态。

use std::cell::RefCell;

pub trait StateCell<T> {
    /// 借用状态执行 `f`；容器已失效或正被借用时返回 `None`，`f` 不会被调用
    fn update_state<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;
}

impl<T> StateCell<T> for RefCell<T> {
    fn update_state<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.try_borrow_mut().ok().map(|mut state| f(&mut *state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_cell_skips_update() {
        let cell = RefCell::new(1);
        assert_eq!(cell.update_state(|n| *n += 1), Some(()));

        let guard = cell.borrow();
        assert_eq!(cell.update_state(|n| *n += 1), None);
        drop(guard);
        assert_eq!(*cell.borrow(), 2);
    }
}
