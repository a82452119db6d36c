use chrono::NaiveDate;
use tasktrack_core::{
    FileStorage, Goal, GoalId, Priority, Storage, StorageConfig, Task, TaskId,
};
use tempfile::TempDir;

fn create_test_storage() -> (FileStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("data").join("tasks.txt"));
    (storage, temp_dir)
}

fn task(id: u64, name: &str, category: &str) -> Task {
    Task {
        id: TaskId(id),
        name: name.to_string(),
        description: String::new(),
        category: category.to_string(),
        deadline: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        priority: Priority::High,
        is_complete: false,
    }
}

#[test]
fn test_load_missing_file_is_empty() {
    let (storage, _temp) = create_test_storage();

    let snapshot = storage.load().unwrap();
    assert!(snapshot.tasks.is_empty());
    assert!(snapshot.goals.is_empty());
}

#[test]
fn test_save_writes_tasks_then_goals() {
    let (storage, _temp) = create_test_storage();

    let tasks = vec![task(10, "Write report", "Work"), task(11, "Clean house", "Personal")];
    let mut goal = Goal::new(GoalId(3), "Promotion");
    goal.add_task(TaskId(11));
    let goals = vec![goal, Goal::new(GoalId(4), "Someday")];

    storage.save(&tasks, &goals).unwrap();

    let content = std::fs::read_to_string(storage.path()).unwrap();
    assert_eq!(
        content,
        "Task:Write report,,Work,2024-05-01,High,false\n\
         Task:Clean house,,Personal,2024-05-01,High,false\n\
         Goal:Promotion,false,1\n\
         Goal:Someday,false\n"
    );
}

#[test]
fn test_save_overwrites_and_leaves_no_temp_file() {
    let (storage, _temp) = create_test_storage();

    storage
        .save(&[task(1, "One", "Work"), task(2, "Two", "Work")], &[])
        .unwrap();
    storage.save(&[task(1, "Only", "Work")], &[]).unwrap();

    let snapshot = storage.load().unwrap();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].name, "Only");

    let mut tmp = storage.path().as_os_str().to_owned();
    tmp.push(".tmp");
    assert!(!std::path::Path::new(&tmp).exists());
}

#[test]
fn test_round_trip_with_commas_and_links() {
    let (storage, _temp) = create_test_storage();

    let mut first = task(5, "Pack boxes, tape", "Moving");
    first.description = "Kitchen first,\nthen garage".to_string();
    first.is_complete = true;
    let tasks = vec![first, task(9, "Book van", "Moving")];
    let mut goal = Goal::new(GoalId(1), "Move, finally");
    goal.add_task(TaskId(9));
    goal.add_task(TaskId(5));
    goal.is_complete = true;

    storage.save(&tasks, &[goal]).unwrap();
    let snapshot = storage.load().unwrap();

    assert_eq!(snapshot.tasks.len(), 2);
    assert_eq!(snapshot.tasks[0].name, "Pack boxes, tape");
    assert_eq!(snapshot.tasks[0].description, "Kitchen first,\nthen garage");
    assert!(snapshot.tasks[0].is_complete);

    let goal = &snapshot.goals[0];
    assert_eq!(goal.name, "Move, finally");
    assert!(goal.is_complete);
    // Ids are reassigned in file order: "Book van" is now #2.
    assert_eq!(goal.task_ids, vec![snapshot.tasks[1].id, snapshot.tasks[0].id]);
}

#[test]
fn test_load_skips_malformed_lines() {
    let (storage, _temp) = create_test_storage();
    std::fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
    std::fs::write(
        storage.path(),
        "Task:Good,,Work,2024-05-01,Low,false\n\
         Task:Bad,,Work,not-a-date,Low,false\n\
         Goal:Fine,true\n",
    )
    .unwrap();

    let snapshot = storage.load().unwrap();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].name, "Good");
    assert_eq!(snapshot.goals.len(), 1);
}

#[test]
fn test_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfig {
        data_dir: temp_dir.path().to_string_lossy().to_string(),
        data_file: "custom.txt".to_string(),
    };

    let storage = FileStorage::with_config(&config);
    storage.save(&[task(1, "One", "Work")], &[]).unwrap();

    assert!(temp_dir.path().join("custom.txt").exists());
}
