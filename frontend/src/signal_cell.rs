//! 让响应式信号承载客户端的异步流程

use carrent_client::StateCell;
use leptos::prelude::*;

/// `RwSignal` 上的 `StateCell`
///
/// 页面卸载、信号被释放之后，迟到的响应不再写入任何状态。
pub struct SignalCell<T: 'static>(pub RwSignal<T>);

impl<T> StateCell<T> for SignalCell<T>
where
    T: Send + Sync + 'static,
{
    fn update_state<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.0.try_update(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::prelude::Owner;

    #[test]
    fn test_disposed_signal_skips_update() {
        let owner = Owner::new();
        owner.with(|| {
            let signal = RwSignal::new(1);
            let cell = SignalCell(signal);
            assert_eq!(cell.update_state(|n| *n += 1), Some(()));
            assert_eq!(signal.get_untracked(), 2);

            signal.dispose();
            assert_eq!(cell.update_state(|n| *n += 1), None);
        });
    }
}
