use amazed::maze::{generate, GraphMaze, GridMaze, Maze, NodeId};
use amazed::solver::{
    solve, ExecutorKind, InlineExecutor, SolveReport, Solver, SolverConfig, ThreadExecutor,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

fn fixture(name: &str) -> GridMaze {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path).expect("fixture exists");
    GridMaze::parse(&text).expect("fixture parses")
}

fn config(kind: ExecutorKind, fork_after: usize) -> SolverConfig {
    SolverConfig::default()
        .with_executor(kind)
        .with_workers(4)
        .with_fork_after(fork_after)
}

/// Start and goal at the ends, neighbors in the maze, predecessor edges
/// matching the path, no repeated nodes.
fn assert_valid_path(maze: &dyn Maze, report: &SolveReport) {
    let path = report.path.as_ref().expect("expected a path");
    assert_eq!(path.first(), Some(&maze.start()));
    assert!(maze.has_goal(*path.last().unwrap()));

    for pair in path.windows(2) {
        assert!(
            maze.neighbors(pair[0]).contains(&pair[1]),
            "{} -> {} is not a maze edge",
            pair[0],
            pair[1]
        );
        assert_eq!(
            report.predecessor(pair[1]),
            Some(pair[0]),
            "arrival at {} is unexplained",
            pair[1]
        );
    }

    let mut seen = HashSet::new();
    assert!(path.iter().all(|n| seen.insert(*n)), "path revisits a node");
}

#[test]
fn test_corridor_map() {
    let maze = Arc::new(fixture("corridor.map"));
    let solver = Solver::new(maze.clone(), config(ExecutorKind::Inline, 1).sequential()).unwrap();
    let report = solver.run().unwrap();

    assert_eq!(report.path, Some(vec![6, 7, 8]));
    assert_eq!(report.statistics.tasks_spawned, 1);
}

#[test]
fn test_branches_map_on_every_executor() {
    for kind in [ExecutorKind::Inline, ExecutorKind::Threads, ExecutorKind::Pool] {
        for fork_after in [1, 2, 5, usize::MAX] {
            let maze = Arc::new(fixture("branches.map"));
            let report = Solver::new(maze.clone(), config(kind, fork_after))
                .unwrap()
                .run()
                .unwrap();
            assert_valid_path(&*maze, &report);
        }
    }
}

#[test]
fn test_walled_goal_drains_every_task() {
    for kind in [ExecutorKind::Inline, ExecutorKind::Threads, ExecutorKind::Pool] {
        let maze = Arc::new(fixture("walled.map"));
        let report = Solver::new(maze.clone(), config(kind, 1))
            .unwrap()
            .run()
            .unwrap();

        assert!(report.path.is_none());
        // Every open cell reachable from the start was claimed exactly once.
        assert_eq!(report.statistics.nodes_visited, 10);
        assert_eq!(report.statistics.nodes_expanded, 10);
        assert!(report.statistics.forks > 0);
    }
}

#[test]
fn test_generated_mazes_solve_on_pool() {
    for seed in 0..10 {
        let text = generate(41, 21, Some(seed)).unwrap();
        let maze = Arc::new(GridMaze::parse(&text).unwrap());
        let report = Solver::new(maze.clone(), config(ExecutorKind::Pool, 3))
            .unwrap()
            .run()
            .unwrap();
        assert_valid_path(&*maze, &report);
    }
}

#[test]
fn test_every_node_claimed_once() {
    // A perfect maze with the goal turned into floor: every open cell is
    // reachable and the search has to drain all of them.
    let text = generate(31, 31, Some(99)).unwrap().replace('$', " ");
    let maze = Arc::new(GridMaze::parse(&text).unwrap());

    let report = Solver::new(maze.clone(), config(ExecutorKind::Threads, 1))
        .unwrap()
        .run()
        .unwrap();
    assert!(report.path.is_none());

    let open_cells = (0..maze.width() * maze.height())
        .filter(|&n| maze.is_open(n))
        .count() as u64;
    assert_eq!(report.statistics.nodes_visited, open_cells);
    assert_eq!(report.statistics.nodes_expanded, open_cells);
}

#[test]
fn test_deterministic_substrate_repeats_path() {
    let maze = Arc::new(fixture("branches.map"));
    let solver = Solver::with_executor(maze, 2, Arc::new(InlineExecutor));
    let paths: Vec<_> = (0..5).map(|_| solver.run().unwrap().path).collect();
    assert!(paths[0].is_some());
    assert!(paths.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_racing_branches_keep_one_predecessor() {
    // 0 splits into 1 and 2, both lead to 3, which leads to the goal 4.
    let maze = GraphMaze::new(5, 0)
        .unwrap()
        .with_chain(&[0, 1, 3, 4])
        .unwrap()
        .with_chain(&[0, 2, 3])
        .unwrap()
        .with_goal(4)
        .unwrap();
    let maze = Arc::new(maze);

    for _ in 0..50 {
        let solver = Solver::with_executor(maze.clone(), 1, Arc::new(ThreadExecutor::new()));
        let report = solver.run().unwrap();
        assert_valid_path(&*maze, &report);

        let path = report.path.as_ref().unwrap();
        let via: NodeId = path[1];
        assert!(via == 1 || via == 2);
        assert_eq!(report.predecessor(3), Some(via));
    }
}

#[test]
fn test_solve_convenience() {
    let maze = GraphMaze::new(3, 0)
        .unwrap()
        .with_chain(&[0, 1, 2])
        .unwrap()
        .with_goal(2)
        .unwrap();
    assert_eq!(solve(Arc::new(maze), usize::MAX).unwrap(), Some(vec![0, 1, 2]));

    let isolated = GraphMaze::new(3, 0)
        .unwrap()
        .with_edge(0, 1)
        .unwrap()
        .with_goal(2)
        .unwrap();
    assert_eq!(solve(Arc::new(isolated), 1).unwrap(), None);
}

/// Start to goal through open, adjacent cells without repeats.
fn assert_walk(maze: &GridMaze, path: &[NodeId]) {
    assert_eq!(path.first(), Some(&maze.start()));
    assert!(maze.has_goal(*path.last().unwrap()));
    assert!(path.windows(2).all(|pair| maze.neighbors(pair[0]).contains(&pair[1])));
    let mut seen = HashSet::new();
    assert!(path.iter().all(|n| seen.insert(*n)), "path revisits a node");
}

fn generated(size: usize, seed: u64) -> Arc<GridMaze> {
    let text = generate(size, size, Some(seed)).unwrap();
    Arc::new(GridMaze::parse(&text).unwrap())
}

#[test]
fn test_large_maze_through_solve() {
    let maze = generated(1001, 9);
    let path = solve(maze.clone(), 4).unwrap().expect("generated mazes are connected");
    assert_walk(&maze, &path);
}

#[test]
fn test_large_maze_forking_every_step_on_two_workers() {
    let maze = generated(1001, 3);
    let report = Solver::new(maze.clone(), config(ExecutorKind::Pool, 1).with_workers(2))
        .unwrap()
        .run()
        .unwrap();
    assert_valid_path(&*maze, &report);
    assert!(report.statistics.tasks_spawned > 100);
}

#[test]
fn test_large_maze_inline_forking_every_step() {
    let maze = generated(601, 5);
    let report = Solver::new(maze.clone(), config(ExecutorKind::Inline, 1))
        .unwrap()
        .run()
        .unwrap();
    assert_valid_path(&*maze, &report);
    assert!(report.statistics.tasks_spawned > 100);
}

#[test]
fn test_large_maze_on_threads() {
    let maze = generated(401, 7);
    let report = Solver::new(maze.clone(), config(ExecutorKind::Threads, 4))
        .unwrap()
        .run()
        .unwrap();
    assert_valid_path(&*maze, &report);
}

#[test]
fn test_large_maze_without_goal_drains_on_pool() {
    let text = generate(501, 501, Some(11)).unwrap().replace('$', " ");
    let maze = Arc::new(GridMaze::parse(&text).unwrap());
    let report = Solver::new(maze.clone(), config(ExecutorKind::Pool, 1).with_workers(2))
        .unwrap()
        .run()
        .unwrap();

    assert!(report.path.is_none());
    let open_cells = (0..maze.width() * maze.height())
        .filter(|&n| maze.is_open(n))
        .count() as u64;
    assert_eq!(report.statistics.nodes_visited, open_cells);
}
