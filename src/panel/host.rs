//! 宿主能力接口
//!
//! 面板核心不依赖任何 UI 框架，上下文菜单的展示由宿主注入

use crate::panel::menu::ActionMenu;

/// 上下文菜单宿主
///
/// 展示菜单后立即返回，不带结果；选择由宿主调用
/// [`ActionMenu::select`] 完成。
pub trait MenuHost: Send + Sync {
    fn show_context_menu(&self, menu: &ActionMenu);
}

/// 终端宿主：把菜单打印到标准输出
#[derive(Debug, Default)]
pub struct ConsoleMenuHost {
    /// 是否同时打印命令内容
    pub show_commands: bool,
}

impl ConsoleMenuHost {
    pub fn new(show_commands: bool) -> Self {
        Self { show_commands }
    }

    /// 生成要打印的文本
    pub fn format_menu(&self, menu: &ActionMenu) -> String {
        let mut out = format!("{}\n", menu.label());
        if menu.items().is_empty() {
            out.push_str("  (无可用动作)\n");
            return out;
        }

        for (line, item) in menu.render().iter().zip(menu.items()) {
            if self.show_commands {
                out.push_str(&format!("  {:<28} {}\n", line, item.command));
            } else {
                out.push_str(&format!("  {}\n", line));
            }
        }
        out
    }
}

impl MenuHost for ConsoleMenuHost {
    fn show_context_menu(&self, menu: &ActionMenu) {
        print!("{}", self.format_menu(menu));
    }
}
