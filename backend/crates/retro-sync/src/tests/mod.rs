mod sprint_locks;
