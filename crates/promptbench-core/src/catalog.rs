//! The fixed benchmark battery.
//!
//! Ten coding-assistant scenarios, always built in the same order so reports
//! from different backends line up row by row. Two cases read their source
//! text from the sample directory; the rest carry inline fixtures.

use std::path::Path;

use crate::error::Result;
use crate::test_case::{read_fixture, TestCase};

pub const BUG_DETECTION: &str = "Bug Detection";
pub const CODE_REFACTORING: &str = "Code Refactoring";
pub const ALGORITHM_IMPLEMENTATION: &str = "Algorithm Implementation";
pub const COMPLEX_REASONING: &str = "Complex Reasoning";
pub const MULTI_STEP_TASK: &str = "Multi-step Task";
pub const CODE_REVIEW: &str = "Code Review";
pub const SQL_OPTIMISATION: &str = "SQL Optimisation";
pub const API_DESIGN: &str = "API Design";
pub const SECURITY_AUDIT: &str = "Security Audit";
pub const ARCHITECTURE_DECISION: &str = "Architecture Decision";

/// Sample file used by [`BUG_DETECTION`].
pub const BUGGY_CALCULATOR_FIXTURE: &str = "buggy-calculator.ts";

/// Sample file used by [`CODE_REFACTORING`].
pub const API_ENDPOINT_FIXTURE: &str = "api-endpoint.ts";

/// Build the full catalog, reading file fixtures from `sample_dir`.
pub fn standard_catalog(sample_dir: &Path) -> Result<Vec<TestCase>> {
    Ok(vec![
        bug_detection(sample_dir)?,
        code_refactoring(sample_dir)?,
        algorithm_implementation(),
        complex_reasoning(),
        multi_step_task(),
        code_review(),
        sql_optimisation(),
        api_design(),
        security_audit(),
        architecture_decision(),
    ])
}

pub fn bug_detection(sample_dir: &Path) -> Result<TestCase> {
    let code = read_fixture(sample_dir, BUGGY_CALCULATOR_FIXTURE)?;
    Ok(TestCase::new(
        BUG_DETECTION,
        format!(
            "Analyse this TypeScript code and identify all bugs. List each bug with line number and explanation:\n\n```typescript\n{code}\n```"
        ),
    ))
}

pub fn code_refactoring(sample_dir: &Path) -> Result<TestCase> {
    let code = read_fixture(sample_dir, API_ENDPOINT_FIXTURE)?;
    Ok(TestCase::new(
        CODE_REFACTORING,
        format!(
            "Refactor this TypeScript code to fix the issues listed in the comments. Provide the improved code:\n\n```typescript\n{code}\n```"
        ),
    ))
}

pub fn algorithm_implementation() -> TestCase {
    TestCase::new(
        ALGORITHM_IMPLEMENTATION,
        "Implement a TypeScript function that finds the longest palindromic substring in a string. Include:
1. The implementation using dynamic programming
2. Time and space complexity analysis
3. Example usage with test cases",
    )
}

pub fn complex_reasoning() -> TestCase {
    TestCase::new(
        COMPLEX_REASONING,
        "A farmer needs to transport a wolf, a goat, and a cabbage across a river. The boat can only carry the farmer and one item at a time. If left alone:
- The wolf will eat the goat
- The goat will eat the cabbage

Find the minimum number of crossings and explain each step.",
    )
    .with_extended_reasoning()
}

pub fn multi_step_task() -> TestCase {
    TestCase::new(
        MULTI_STEP_TASK,
        "Create a complete TypeScript module for a simple task queue with these features:
1. Add tasks with priority (1-5)
2. Process tasks in priority order (highest first)
3. Support async task execution
4. Track task status (pending, running, completed, failed)
5. Include proper TypeScript types
6. Add JSDoc comments

Provide the complete, working code.",
    )
}

const CODE_REVIEW_SOURCE: &str = r#"
async function fetchUserData(userId) {
  const response = await fetch(`/api/users/${userId}`);
  const data = response.json();
  return data;
}

function processUsers(users) {
  let result = [];
  for (let i = 0; i <= users.length; i++) {
    if (users[i].active == true) {
      result.push(users[i].name.toUpperCase());
    }
  }
  return result;
}

class DataProcessor {
  data = null;

  async load(url) {
    this.data = await fetch(url).then(r => r.json());
  }

  process() {
    return this.data.map(item => {
      item.processed = true;
      return item;
    });
  }
}"#;

pub fn code_review() -> TestCase {
    TestCase::new(
        CODE_REVIEW,
        format!(
            "Review this JavaScript code and identify all issues (bugs, bad practices, potential errors). Rate severity (high/medium/low) for each:\n\n```javascript\n{CODE_REVIEW_SOURCE}\n```"
        ),
    )
}

const SLOW_QUERY: &str = "
-- Slow query that needs optimisation
SELECT
    u.id,
    u.name,
    u.email,
    COUNT(o.id) as order_count,
    SUM(o.total) as total_spent,
    (SELECT MAX(created_at) FROM orders WHERE user_id = u.id) as last_order_date
FROM users u
LEFT JOIN orders o ON o.user_id = u.id
WHERE u.created_at > '2024-01-01'
AND u.status = 'active'
AND (SELECT COUNT(*) FROM orders WHERE user_id = u.id AND status = 'completed') > 5
GROUP BY u.id, u.name, u.email
HAVING SUM(o.total) > 1000
ORDER BY total_spent DESC
LIMIT 100;
";

pub fn sql_optimisation() -> TestCase {
    TestCase::new(
        SQL_OPTIMISATION,
        format!(
            "Analyse this SQL query and optimise it for better performance. Explain the issues and provide the optimised query with index recommendations:\n\n```sql\n{SLOW_QUERY}\n```"
        ),
    )
}

pub fn api_design() -> TestCase {
    TestCase::new(
        API_DESIGN,
        "Design a RESTful API for a task management system with the following requirements:
1. Users can create, read, update, delete tasks
2. Tasks have: title, description, status, priority, due date, assignee
3. Tasks can have comments and attachments
4. Support filtering, sorting, and pagination
5. Include authentication and authorisation

Provide:
- API endpoint specifications (method, path, request/response)
- Authentication approach
- Error handling strategy
- Rate limiting recommendations",
    )
}

const VULNERABLE_EXPRESS_APP: &str = r#"
const express = require('express');
const mysql = require('mysql');
const app = express();

const db = mysql.createConnection({
  host: 'localhost',
  user: 'root',
  password: 'admin123',
  database: 'users'
});

app.get('/user', (req, res) => {
  const userId = req.query.id;
  db.query(`SELECT * FROM users WHERE id = ${userId}`, (err, results) => {
    res.json(results);
  });
});

app.post('/login', (req, res) => {
  const { username, password } = req.body;
  db.query(`SELECT * FROM users WHERE username = '${username}' AND password = '${password}'`, (err, results) => {
    if (results.length > 0) {
      res.cookie('user', username);
      res.json({ success: true, user: results[0] });
    } else {
      res.json({ success: false });
    }
  });
});

app.get('/file', (req, res) => {
  const filename = req.query.name;
  res.sendFile('/uploads/' + filename);
});

app.listen(3000);
"#;

pub fn security_audit() -> TestCase {
    TestCase::new(
        SECURITY_AUDIT,
        format!(
            "Perform a security audit on this Node.js/Express code. Identify all security vulnerabilities, rate their severity (Critical/High/Medium/Low), and provide fixes:\n\n```javascript\n{VULNERABLE_EXPRESS_APP}\n```"
        ),
    )
}

pub fn architecture_decision() -> TestCase {
    TestCase::new(
        ARCHITECTURE_DECISION,
        "A startup is building a real-time collaboration platform (like Google Docs) with these requirements:
- Support 10,000 concurrent users per document
- Sub-100ms latency for edits
- Offline support with sync
- Version history and conflict resolution
- Multi-region deployment

Compare and recommend architectures:
1. WebSocket vs Server-Sent Events vs WebRTC
2. CRDT vs Operational Transformation
3. Database choice (PostgreSQL vs MongoDB vs custom)
4. Message queue selection

Provide a detailed recommendation with trade-offs.",
    )
}
