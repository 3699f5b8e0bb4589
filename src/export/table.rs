// ==========================================
// 值班排班系统 - 控制台表格输出
// ==========================================
// 职责: 排班结果与产能分析的等宽文本表格
// ==========================================

use crate::domain::{BlockAssignment, RosterProblem};
use crate::engine::validator::CapacityAnalysis;
use std::fmt::Write;

/// 排班结果表格
///
/// 列: 全局周号 + 每个角色一列 (配置声明序), 值为工程师名;
/// 完整性关闭产生的空槽位显示为 "-"
pub fn format_roster_table(problem: &RosterProblem, assignments: &[BlockAssignment]) -> String {
    // 每列宽度: 角色名与该列所有工程师名的最大长度
    let widths: Vec<usize> = problem
        .roles
        .iter()
        .enumerate()
        .map(|(r, role)| {
            let name_max = assignments
                .iter()
                .flat_map(|a| a.slots.iter())
                .filter_map(|week| week[r])
                .map(|e| problem.team[e].chars().count())
                .max()
                .unwrap_or(1);
            role.name.chars().count().max(name_max)
        })
        .collect();

    let mut out = String::new();
    let mut header = format!("{:<6}", "Week");
    for (role, &width) in problem.roles.iter().zip(&widths) {
        let _ = write!(header, " | {:<width$}", role.name);
    }
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "-".repeat(header.chars().count()));

    let weeks_per_block = problem.weeks_per_block as usize;
    for assignment in assignments {
        for (week_index, week) in assignment.slots.iter().enumerate() {
            let global_week = assignment.block_index * weeks_per_block + week_index + 1;
            let mut row = format!("{global_week:<6}");
            for (r, &width) in (0..problem.roles.len()).zip(&widths) {
                let name = week[r]
                    .map(|e| problem.team[e].as_str())
                    .unwrap_or("-");
                let _ = write!(row, " | {name:<width$}");
            }
            let _ = writeln!(out, "{row}");
        }
    }

    out
}

/// 产能分析文本 (validate 命令输出)
pub fn format_capacity_analysis(analysis: &CapacityAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "产能分析:");
    let _ = writeln!(out, "   工程师: {} 人", analysis.engineers);
    let _ = writeln!(
        out,
        "   排期: {} 块 × {} 周",
        analysis.num_blocks, analysis.weeks_per_block
    );
    let _ = writeln!(out, "   每周角色数: {}", analysis.roles_per_week);
    let _ = writeln!(out, "   每块需求: {} 人班", analysis.required_per_block);
    let _ = writeln!(
        out,
        "   每块可用上限: {} 人班",
        analysis.available_per_block
    );
    if let (Some(required), Some(available)) =
        (analysis.weekend_required, analysis.weekend_available)
    {
        let _ = writeln!(
            out,
            "   周末角色: 每块需求 {required} 班, 可用上限 {available} 班"
        );
    }
    out
}
