//! Built-in metadata for commonly used tools.

pub(super) type BuiltinEntry = (&'static str, &'static [&'static str], &'static [&'static str]);

pub(super) const BUILTIN_COMMANDS: &[BuiltinEntry] = &[
    (
        "git",
        &[
            "add", "bisect", "blame", "branch", "checkout", "cherry-pick", "clean", "clone",
            "commit", "config", "diff", "fetch", "grep", "init", "log", "merge", "mv", "pull",
            "push", "rebase", "reflog", "remote", "reset", "restore", "revert", "rm", "show",
            "stash", "status", "switch", "tag", "worktree",
        ],
        &[
            "-a", "--all", "-b", "-d", "-D", "-f", "--force", "-m", "--message", "-p", "--patch",
            "-u", "--set-upstream", "-v", "--verbose", "-q", "--quiet", "--amend", "--hard",
            "--soft", "--oneline", "--graph", "--short", "--cached", "--staged", "--no-edit",
            "--rebase", "--tags", "--depth", "--global", "--list", "-C",
        ],
    ),
    (
        "docker",
        &[
            "attach", "build", "commit", "compose", "cp", "create", "exec", "images", "info",
            "inspect", "kill", "login", "logout", "logs", "network", "pause", "port", "ps",
            "pull", "push", "restart", "rm", "rmi", "run", "start", "stats", "stop", "system",
            "tag", "top", "unpause", "version", "volume",
        ],
        &[
            "-a", "--all", "-d", "--detach", "-e", "--env", "-f", "--file", "--follow",
            "--force", "-i", "--interactive", "-it", "-n", "--name", "-p", "--publish", "-q",
            "--quiet", "--rm", "-t", "--tag", "--tty", "-v", "--volume", "-w", "--workdir",
            "--no-cache", "--network",
        ],
    ),
    (
        "kubectl",
        &[
            "annotate", "apply", "attach", "autoscale", "config", "cp", "create", "delete",
            "describe", "diff", "edit", "exec", "explain", "expose", "get", "label", "logs",
            "patch", "port-forward", "rollout", "run", "scale", "top",
        ],
        &[
            "-A", "--all-namespaces", "-c", "--container", "-f", "--filename", "--follow", "-l",
            "--selector", "-n", "--namespace", "-o", "--output", "-w", "--watch", "--context",
            "--dry-run",
        ],
    ),
    (
        "npm",
        &[
            "audit", "cache", "ci", "config", "init", "install", "link", "ls", "outdated",
            "publish", "run", "start", "test", "uninstall", "update", "version",
        ],
        &[
            "-D", "--save-dev", "-g", "--global", "-S", "--save", "--production", "--force",
            "--legacy-peer-deps", "--silent",
        ],
    ),
    (
        "cargo",
        &[
            "add", "bench", "build", "check", "clean", "clippy", "doc", "fmt", "init", "install",
            "new", "publish", "remove", "run", "search", "test", "tree", "update",
        ],
        &[
            "-p", "--package", "-r", "--release", "-q", "--quiet", "-v", "--verbose",
            "--all-features", "--features", "--no-default-features", "--workspace", "--lib",
            "--bin", "--target", "-j", "--jobs",
        ],
    ),
    (
        "ls",
        &[],
        &[
            "-a", "--all", "-A", "--almost-all", "-l", "-h", "--human-readable", "-r",
            "--reverse", "-R", "--recursive", "-t", "-S", "-1", "-d", "--directory", "--color",
        ],
    ),
];
