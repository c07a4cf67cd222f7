//! Department mutations. Members reference departments by name, so a rename
//! cascades onto every member of the department.

use super::{new_id, non_blank, today, SyncSession, REMOTE_INCONSISTENT};
use crate::errors::AppError;
use crate::local::Collection;
use crate::models::{Department, DepartmentUpdate, NewDepartment, Notification};

impl SyncSession {
    pub async fn add_department(&mut self, request: NewDepartment) -> Result<Department, AppError> {
        let department = Department {
            id: new_id(),
            name: request.name.trim().to_string(),
            description: non_blank(request.description),
            created_date: today(),
        };

        if let Err(e) = self.validate_department_name(&department.name, None) {
            return Err(self.reject(e));
        }

        let department = match self.remote_store() {
            Some(store) => match store.insert_department(&department).await {
                Ok(saved) => saved,
                Err(e) => return Err(self.mutation_failed("Failed to add department.", e)),
            },
            None => department,
        };

        self.departments.push(department.clone());
        self.persist(&[Collection::Departments]).await;
        self.succeed("Department added successfully!");
        Ok(department)
    }

    /// Rename or re-describe a department, moving its members along.
    pub async fn edit_department(
        &mut self,
        id: &str,
        update: DepartmentUpdate,
    ) -> Result<Department, AppError> {
        let Some(previous) = self.departments.iter().find(|d| d.id == id).cloned() else {
            return Err(self.reject(AppError::NotFound(format!("Department {} not found", id))));
        };

        let update = DepartmentUpdate {
            name: update.name.trim().to_string(),
            description: non_blank(update.description),
        };

        if let Err(e) = self.validate_department_name(&update.name, Some(id)) {
            return Err(self.reject(e));
        }

        let renamed = update.name != previous.name;

        let department = match self.remote_store() {
            Some(store) => {
                let moved = if renamed {
                    match store
                        .rename_members_department(&previous.name, &update.name)
                        .await
                    {
                        Ok(ids) => ids,
                        Err(e) => {
                            return Err(self.mutation_failed("Failed to update department.", e))
                        }
                    }
                } else {
                    Vec::new()
                };

                match store.update_department(id, &update).await {
                    Ok(saved) => saved,
                    Err(e) => {
                        if !moved.is_empty() {
                            if let Err(undo) =
                                store.reassign_members(&moved, &previous.name).await
                            {
                                tracing::error!(
                                    department_id = id,
                                    "Failed to move members back to {}: {}",
                                    previous.name,
                                    undo
                                );
                                return Err(self.mutation_failed(REMOTE_INCONSISTENT, e));
                            }
                        }
                        return Err(self.mutation_failed("Failed to update department.", e));
                    }
                }
            }
            None => Department {
                id: previous.id.clone(),
                name: update.name.clone(),
                description: update.description.clone(),
                created_date: previous.created_date,
            },
        };

        if let Some(slot) = self.departments.iter_mut().find(|d| d.id == id) {
            *slot = department.clone();
        }
        if renamed {
            for member in self
                .members
                .iter_mut()
                .filter(|m| m.department == previous.name)
            {
                member.department = department.name.clone();
            }
        }

        self.persist(&[Collection::Departments, Collection::Members])
            .await;
        self.succeed("Department updated successfully!");
        Ok(department)
    }

    /// Delete a department that no member belongs to.
    pub async fn delete_department(&mut self, id: &str) -> Result<Department, AppError> {
        let Some(department) = self.departments.iter().find(|d| d.id == id).cloned() else {
            return Err(self.reject(AppError::NotFound(format!("Department {} not found", id))));
        };

        let member_count = self
            .members
            .iter()
            .filter(|m| m.department == department.name)
            .count();

        if member_count > 0 {
            let message = format!(
                "Cannot delete department \"{}\" because {} team member(s) are assigned to it.",
                department.name, member_count
            );
            self.notifications
                .push(Notification::error("Cannot Delete", message.clone()));
            return Err(AppError::Constraint {
                message,
                member_count: Some(member_count),
            });
        }

        if let Some(store) = self.remote_store() {
            if let Err(e) = store.delete_department(id).await {
                return Err(self.mutation_failed("Failed to delete department.", e));
            }
        }

        self.departments.retain(|d| d.id != id);
        self.persist(&[Collection::Departments]).await;
        self.succeed("Department deleted successfully!");
        Ok(department)
    }

    /// Non-empty and unique ignoring case, `except` being the department under edit.
    fn validate_department_name(&self, name: &str, except: Option<&str>) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::Validation(
                "Department name is required".to_string(),
            ));
        }

        if self
            .departments
            .iter()
            .any(|d| Some(d.id.as_str()) != except && d.has_name(name))
        {
            return Err(AppError::constraint(
                "A department with this name already exists",
            ));
        }

        Ok(())
    }
}
