//! 状态探测基准测试
//!
//! 测试探测结果判定与配置变量展开的性能

use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, Criterion};
use service_panel::config::{ConfigLoader, TomlConfigLoader};
use service_panel::executor::{CommandExecutor, CommandResult};
use service_panel::status::{matches_expected, StatusProbe};
use std::hint::black_box;
use std::sync::Arc;

/// 固定返回运行中的执行器
struct ActiveExecutor;

#[async_trait]
impl CommandExecutor for ActiveExecutor {
    async fn execute(&self, _command: &str) -> CommandResult {
        CommandResult::new(0, "active\n", "")
    }
}

const CONFIG: &str = r#"
[variables]
conf_dir = "/home/deck/Dotfiles"
sudo = "${conf_dir}/deck/deck_sudo"

[[services]]
name = "Samba"
status_command = "systemctl is-active smb"
expected_status_output = "active"
start_command = "${sudo} systemctl restart smb"
stop_command = "${sudo} systemctl stop smb"

[[services]]
name = "Ethernet over USB"
status_command = "ip route | grep -o usb0"
expected_status_output = "usb0"
start_command = "${sudo} ${conf_dir}/deck/usb-ether.sh start -n -R"
stop_command = "${sudo} ${conf_dir}/deck/usb-ether.sh stop"
"#;

/// 探测判定基准测试
fn status_probe_benchmark(c: &mut Criterion) {
    c.bench_function("matches_expected", |b| {
        b.iter(|| {
            black_box(matches_expected(
                black_box(0),
                black_box("  active\n"),
                black_box("active"),
            ))
        });
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("创建运行时失败");
    let probe = StatusProbe::new(Arc::new(ActiveExecutor));

    c.bench_function("status_probe", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(
                    probe
                        .probe(Some("systemctl is-active smb"), Some("active"))
                        .await,
                )
            })
        });
    });

    let loader = TomlConfigLoader::new(false);
    c.bench_function("config_load_with_variables", |b| {
        b.iter(|| {
            runtime.block_on(async {
                black_box(loader.load_from_string(black_box(CONFIG)).await.is_ok())
            })
        });
    });
}

criterion_group!(benches, status_probe_benchmark);
criterion_main!(benches);
