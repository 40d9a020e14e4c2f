// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the job-report repository.

pub mod artifacts;
pub mod job_reports;
