//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use sqlx::PgPool;

const ADMIN_PASSWORD: &str = "Test123!";
const STAFF_PASSWORD: &str = "Teach123!";
const STUDENT_PASSWORD: &str = "Learn123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== LearnHub Seed Script ===");

    seed_users(&pool).await?;
    seed_catalog(&pool).await?;
    seed_enrollments(&pool).await?;
    seed_subscriptions(&pool).await?;
    seed_submissions(&pool).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: admin / {ADMIN_PASSWORD}");
    println!("Moderator logins: mod_ada, mod_grace / {STAFF_PASSWORD}");
    println!("Student logins: alice, bob, carol, dan / {STUDENT_PASSWORD}");

    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = 'admin')")
            .fetch_one(pool)
            .await?;

    let admin_hash = learnhub::services::auth::hash_password(ADMIN_PASSWORD)?;

    if exists {
        // Update password for existing admin user
        sqlx::query("UPDATE users SET password_hash = $1 WHERE username = 'admin'")
            .bind(&admin_hash)
            .execute(pool)
            .await?;
        println!("[done] Updated admin password");
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO users (username, email, password_hash, full_name, role)
         VALUES ('admin', 'admin@learnhub.local', $1, 'Platform Administrator', 'administrator')",
    )
    .bind(&admin_hash)
    .execute(pool)
    .await?;

    let staff_hash = learnhub::services::auth::hash_password(STAFF_PASSWORD)?;
    let moderators = [
        ("mod_ada", "ada@learnhub.local", "Ada Lovelace"),
        ("mod_grace", "grace@learnhub.local", "Grace Hopper"),
    ];
    for (username, email, full_name) in moderators {
        sqlx::query(
            "INSERT INTO users (username, email, password_hash, full_name, role)
             VALUES ($1, $2, $3, $4, 'moderator')",
        )
        .bind(username)
        .bind(email)
        .bind(&staff_hash)
        .bind(full_name)
        .execute(pool)
        .await?;
    }

    let student_hash = learnhub::services::auth::hash_password(STUDENT_PASSWORD)?;
    let students = [
        ("alice", "alice@learnhub.local", "Alice Carter"),
        ("bob", "bob@learnhub.local", "Bob Nguyen"),
        ("carol", "carol@learnhub.local", "Carol Reyes"),
        ("dan", "dan@learnhub.local", "Dan Okafor"),
    ];
    for (username, email, full_name) in students {
        sqlx::query(
            "INSERT INTO users (username, email, password_hash, full_name, role)
             VALUES ($1, $2, $3, $4, 'student')",
        )
        .bind(username)
        .bind(email)
        .bind(&student_hash)
        .bind(full_name)
        .execute(pool)
        .await?;
    }

    println!("[done] Created admin, 2 moderators and 4 students");
    Ok(())
}

async fn user_id(pool: &PgPool, username: &str) -> anyhow::Result<i32> {
    let id: i32 = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn course_id(pool: &PgPool, title: &str) -> anyhow::Result<i32> {
    let id: i32 = sqlx::query_scalar("SELECT id FROM courses WHERE title = $1")
        .bind(title)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn seed_catalog(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Courses already exist ({count})");
        return Ok(());
    }

    let ada = user_id(pool, "mod_ada").await?;
    let grace = user_id(pool, "mod_grace").await?;

    let courses = [
        (ada, "Rust Fundamentals", "Ownership, borrowing and the type system", "programming", true),
        (ada, "Systems Programming", "Processes, threads and the OS interface", "programming", true),
        (ada, "Advanced Macros", "Draft material, not yet published", "programming", false),
        (grace, "Databases 101", "Relational modeling and SQL from scratch", "data", true),
    ];
    for (owner, title, description, category, published) in courses {
        sqlx::query(
            "INSERT INTO courses (owner_id, title, description, category, is_published)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(owner)
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(published)
        .execute(pool)
        .await?;
    }

    let rust_course = course_id(pool, "Rust Fundamentals").await?;
    let systems_course = course_id(pool, "Systems Programming").await?;
    let db_course = course_id(pool, "Databases 101").await?;

    let lessons = [
        (rust_course, "Ownership and Borrowing", "Moves, borrows and lifetimes", 1),
        (rust_course, "Error Handling", "Result, the ? operator and error types", 2),
        (systems_course, "Processes and Threads", "Spawning, joining and sharing state", 1),
        (db_course, "Relational Modeling", "Tables, keys and normal forms", 1),
        (db_course, "Query Optimization", "Indexes and reading query plans", 2),
    ];
    for (course, title, summary, position) in lessons {
        sqlx::query(
            "INSERT INTO lessons (course_id, title, summary, position)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(course)
        .bind(title)
        .bind(summary)
        .bind(position)
        .execute(pool)
        .await?;
    }

    // A couple of content blocks on the first lesson
    let first_lesson: i32 =
        sqlx::query_scalar("SELECT id FROM lessons WHERE title = 'Ownership and Borrowing'")
            .fetch_one(pool)
            .await?;
    sqlx::query(
        "INSERT INTO lesson_contents (lesson_id, kind, title, body, position) VALUES
         ($1, 'text', 'Why ownership', 'Every value has a single owner...', 1),
         ($1, 'video', 'Borrow checker walkthrough', 'https://videos.learnhub.local/borrowck', 2)",
    )
    .bind(first_lesson)
    .execute(pool)
    .await?;

    let assignments = [
        ("Ownership and Borrowing", "Ownership quiz", 20),
        ("Error Handling", "Error handling exercise", 100),
        ("Relational Modeling", "Schema design project", 100),
    ];
    for (lesson_title, title, max_score) in assignments {
        let lesson: i32 = sqlx::query_scalar("SELECT id FROM lessons WHERE title = $1")
            .bind(lesson_title)
            .fetch_one(pool)
            .await?;
        sqlx::query(
            "INSERT INTO assignments (lesson_id, title, instructions, max_score)
             VALUES ($1, $2, 'Submit your answers as plain text.', $3)",
        )
        .bind(lesson)
        .bind(title)
        .bind(max_score)
        .execute(pool)
        .await?;
    }

    println!("[done] Created 4 courses, 5 lessons and 3 assignments");
    Ok(())
}

async fn seed_enrollments(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_enrollments")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Enrollments already exist ({count})");
        return Ok(());
    }

    // alice sits in two of Ada's courses; the moderator dashboard should
    // still count her once.
    let pairs = [
        ("alice", "Rust Fundamentals"),
        ("alice", "Systems Programming"),
        ("bob", "Rust Fundamentals"),
        ("carol", "Databases 101"),
        ("dan", "Databases 101"),
    ];
    for (username, course_title) in pairs {
        let student = user_id(pool, username).await?;
        let course = course_id(pool, course_title).await?;
        sqlx::query("INSERT INTO course_enrollments (course_id, student_id) VALUES ($1, $2)")
            .bind(course)
            .bind(student)
            .execute(pool)
            .await?;
    }

    println!("[done] Created 5 enrollments");
    Ok(())
}

async fn seed_subscriptions(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Subscriptions already exist ({count})");
        return Ok(());
    }

    let entries = [
        ("alice", "Rust Fundamentals", "active"),
        ("bob", "Rust Fundamentals", "active"),
        ("carol", "Databases 101", "active"),
        ("dan", "Databases 101", "cancelled"),
    ];
    for (username, course_title, status) in entries {
        let user = user_id(pool, username).await?;
        let course = course_id(pool, course_title).await?;
        sqlx::query(
            "INSERT INTO subscriptions (user_id, course_id, status, expires_at)
             VALUES ($1, $2, $3::subscription_status, NOW() + INTERVAL '30 days')",
        )
        .bind(user)
        .bind(course)
        .bind(status)
        .execute(pool)
        .await?;
    }

    println!("[done] Created 4 subscriptions (3 active)");
    Ok(())
}

async fn seed_submissions(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assignment_submissions")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Submissions already exist ({count})");
        return Ok(());
    }

    // Staggered timestamps so the dashboard's recent activity feed has an
    // unambiguous order.
    let entries = [
        ("alice", "Ownership quiz", 30),
        ("bob", "Ownership quiz", 20),
        ("alice", "Error handling exercise", 10),
        ("carol", "Schema design project", 5),
    ];
    for (username, assignment_title, hours_ago) in entries {
        let student = user_id(pool, username).await?;
        let assignment: i32 = sqlx::query_scalar("SELECT id FROM assignments WHERE title = $1")
            .bind(assignment_title)
            .fetch_one(pool)
            .await?;
        sqlx::query(
            "INSERT INTO assignment_submissions (assignment_id, student_id, content, submitted_at)
             VALUES ($1, $2, 'Seeded submission text.', NOW() - make_interval(hours => $3))",
        )
        .bind(assignment)
        .bind(student)
        .bind(hours_ago)
        .execute(pool)
        .await?;
    }

    // Grade alice's quiz so grading fields are populated somewhere
    let ada = user_id(pool, "mod_ada").await?;
    let alice = user_id(pool, "alice").await?;
    let quiz: i32 = sqlx::query_scalar("SELECT id FROM assignments WHERE title = 'Ownership quiz'")
        .fetch_one(pool)
        .await?;
    sqlx::query(
        "UPDATE assignment_submissions
         SET score = 18, feedback = 'Solid grasp of moves, revisit reborrows.',
             graded_by = $3, graded_at = NOW()
         WHERE assignment_id = $1 AND student_id = $2",
    )
    .bind(quiz)
    .bind(alice)
    .bind(ada)
    .execute(pool)
    .await?;

    println!("[done] Created 4 submissions (1 graded)");
    Ok(())
}
