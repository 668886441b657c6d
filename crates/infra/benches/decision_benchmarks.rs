use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::collections::HashSet;

use chrono::Utc;
use serde_json::json;
use warden_authz::{evaluate, Effect, Statement};
use warden_core::{RoleId, UserId};
use warden_infra::{load_statements, resolve_roles, AccessDirectory};

fn statements(count: usize) -> Vec<Statement> {
    (0..count)
        .map(|i| {
            Statement::new(
                Effect::Allow,
                vec![format!("docs:Action{i}")],
                vec!["*".to_string()],
            )
        })
        .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.throughput(Throughput::Elements(1));

    for statement_count in [1, 10, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("no_match_full_scan", statement_count),
            statement_count,
            |b, &count| {
                let statements = statements(count);
                b.iter(|| {
                    black_box(evaluate(
                        black_box(&statements),
                        "docs:NeverMatches",
                        "docs/1",
                    ))
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("first_statement_match", statement_count),
            statement_count,
            |b, &count| {
                let statements = statements(count);
                b.iter(|| {
                    black_box(evaluate(black_box(&statements), "docs:Action0", "docs/1"))
                });
            },
        );
    }

    group.finish();
}

fn bench_resolve_and_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_and_load");

    for role_count in [1, 10, 50].iter() {
        group.bench_with_input(
            BenchmarkId::new("snapshot_resolve_load", role_count),
            role_count,
            |b, &count| {
                let dir = AccessDirectory::new();
                let user = dir
                    .register_user(UserId::new(), "bench", "bench@example.com")
                    .unwrap();

                for i in 0..count {
                    let role = dir.create_role(format!("Role{i}"), false).unwrap();
                    let policy = dir
                        .create_policy(
                            format!("Policy{i}"),
                            &json!({ "statements": [
                                { "effect": "Allow", "actions": [format!("docs:Action{i}")], "resources": ["*"] }
                            ]}),
                            false,
                        )
                        .unwrap();
                    dir.attach_policy(role.id, policy.id).unwrap();
                    dir.assign_role(user.id, role.id, None, None).unwrap();
                }

                b.iter(|| {
                    let snapshot = dir.snapshot().unwrap();
                    let roles: HashSet<RoleId> =
                        resolve_roles(&snapshot, black_box(user.id), Utc::now());
                    black_box(load_statements(&snapshot, &roles))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_resolve_and_load);
criterion_main!(benches);
