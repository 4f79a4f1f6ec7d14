//! Grading Rules - 作业提交规则与成绩汇总核心
//!
//! 计算小组适用的截止时间与收取时间，应用迟交宽限规则扣除宽限额度，
//! 并汇总作业成绩统计、成绩分布与成绩报表。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（截止时间解析、提交规则引擎、成绩汇总）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
