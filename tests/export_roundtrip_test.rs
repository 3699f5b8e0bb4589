// ==========================================
// 导出一致性测试
// ==========================================
// 职责: CSV 与 iCal 输出描述同一班次集合; 同输入输出逐字节一致
// ==========================================


use chrono::{NaiveDateTime, Weekday};
use oncall_roster::engine::RosterOrchestrator;
use oncall_roster::export::{ical_string, schedule_csv_string};
use std::collections::BTreeSet;
use test_helpers::{create_test_problem, create_test_role};

/// (工程师, 开始, 结束) 集合, 两种导出的共同坐标
type ShiftSet = BTreeSet<(String, NaiveDateTime, NaiveDateTime)>;

fn parse_csv(text: &str) -> ShiftSet {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            (
                record[2].to_string(),
                NaiveDateTime::parse_from_str(&record[3], "%Y-%m-%d %H:%M").unwrap(),
                NaiveDateTime::parse_from_str(&record[4], "%Y-%m-%d %H:%M").unwrap(),
            )
        })
        .collect()
}

fn parse_ical(text: &str) -> ShiftSet {
    let mut set = ShiftSet::new();
    let mut engineer = String::new();
    let mut start = None;
    let mut end = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("DTSTART;") {
            let value = rest.split(':').nth(1).unwrap();
            start = Some(NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").unwrap());
        } else if let Some(rest) = line.strip_prefix("DTEND;") {
            let value = rest.split(':').nth(1).unwrap();
            end = Some(NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").unwrap());
        } else if let Some(summary) = line.strip_prefix("SUMMARY:") {
            engineer = summary.split(" — ").nth(1).unwrap().to_string();
        } else if line == "END:VEVENT" {
            set.insert((engineer.clone(), start.unwrap(), end.unwrap()));
            start = None;
            end = None;
        }
    }
    set
}

fn two_role_problem() -> oncall_roster::RosterProblem {
    create_test_problem(
        vec!["Alice", "Bob", "Charlie", "Diana", "Ethan"],
        vec![
            create_test_role("D", "Day", vec![Weekday::Mon, Weekday::Thu], (9, 0), (17, 0), 1),
            create_test_role("NP", "Night Primary", vec![Weekday::Fri], (17, 0), (9, 0), 3),
        ],
        2,
        2,
        1,
    )
}

// ==========================================
// 测试1: CSV 与 iCal 描述同一班次集合
// ==========================================
#[test]
fn test_csv_ical_same_shift_set() {
    let problem = two_role_problem();
    let result = RosterOrchestrator::new(&problem, &[]).run().unwrap();

    let csv = schedule_csv_string(&result.shifts).unwrap();
    let ical = ical_string(&result.shifts, problem.timezone).unwrap();

    let from_csv = parse_csv(&csv);
    let from_ical = parse_ical(&ical);

    assert!(!from_csv.is_empty());
    assert_eq!(from_csv, from_ical);
    // 每周 2 个 Day + 1 个 NP, 共 2 块 x 2 周
    assert_eq!(from_csv.len(), 12);
}

// ==========================================
// 测试2: 同输入两次求解输出逐字节一致
// ==========================================
#[test]
fn test_byte_identical_reruns() {
    let problem = two_role_problem();

    let first = RosterOrchestrator::new(&problem, &[]).run().unwrap();
    let second = RosterOrchestrator::new(&problem, &[]).run().unwrap();

    assert_eq!(
        schedule_csv_string(&first.shifts).unwrap(),
        schedule_csv_string(&second.shifts).unwrap()
    );
    assert_eq!(
        ical_string(&first.shifts, problem.timezone).unwrap(),
        ical_string(&second.shifts, problem.timezone).unwrap()
    );
}

// ==========================================
// 测试3: UID 携带溯源坐标
// ==========================================
#[test]
fn test_ical_uid_provenance() {
    let problem = two_role_problem();
    let result = RosterOrchestrator::new(&problem, &[]).run().unwrap();
    let ical = ical_string(&result.shifts, problem.timezone).unwrap();

    // 块 1 第 1 周的周五 NP 班次
    assert!(ical.contains("UID:oncall-b1-w1-NP-e0-Fri@oncall-roster"));
    // 块 0 第 0 周的周一 Day 班次
    assert!(ical.contains("UID:oncall-b0-w0-D-e0-Mon@oncall-roster"));
}
