//! Diesel schema for project and task persistence.

diesel::table! {
    /// Projects owned by users.
    projects (id) {
        /// Internal project identifier.
        id -> Uuid,
        /// Globally unique project name.
        #[max_length = 200]
        name -> Varchar,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Time-tracked tasks.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Closed task this task continues.
        cloned_from_id -> Nullable<Uuid>,
        /// Task name.
        #[max_length = 250]
        name -> Varchar,
        /// Start of the measured span.
        started_at -> Timestamptz,
        /// Close timestamp.
        ended_at -> Nullable<Timestamptz>,
        /// Accumulated pause time in whole seconds.
        seconds_paused -> Int8,
        /// Pause timestamp.
        paused_at -> Nullable<Timestamptz>,
        /// Insertion order.
        position -> Int8,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
