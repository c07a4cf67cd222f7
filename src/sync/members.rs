//! Team member mutations and their cascades onto leave requests.

use super::{new_id, non_blank, SyncSession, REMOTE_INCONSISTENT};
use crate::errors::AppError;
use crate::local::Collection;
use crate::models::{LeaveRequest, MemberUpdate, NewMember, TeamMember};

impl SyncSession {
    pub async fn add_member(&mut self, request: NewMember) -> Result<TeamMember, AppError> {
        let member = TeamMember {
            id: new_id(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            department: request.department.trim().to_string(),
            avatar: non_blank(request.avatar),
        };

        if let Err(e) = self.validate_member(&member, None) {
            return Err(self.reject(e));
        }

        let member = match self.remote_store() {
            Some(store) => match store.insert_member(&member).await {
                Ok(saved) => saved,
                Err(e) => return Err(self.mutation_failed("Failed to add team member.", e)),
            },
            None => member,
        };

        self.members.push(member.clone());
        self.persist(&[Collection::Members]).await;
        self.succeed("Team member added successfully!");
        Ok(member)
    }

    /// Replace a member's editable fields. A new name is copied onto every
    /// leave request of that member.
    pub async fn edit_member(
        &mut self,
        id: &str,
        update: MemberUpdate,
    ) -> Result<TeamMember, AppError> {
        let Some(previous) = self.members.iter().find(|m| m.id == id).cloned() else {
            return Err(self.reject(AppError::NotFound(format!("Member {} not found", id))));
        };

        let update = MemberUpdate {
            name: update.name.trim().to_string(),
            email: update.email.trim().to_string(),
            department: update.department.trim().to_string(),
            avatar: non_blank(update.avatar),
        };
        let candidate = TeamMember {
            id: previous.id.clone(),
            name: update.name.clone(),
            email: update.email.clone(),
            department: update.department.clone(),
            avatar: update.avatar.clone(),
        };

        if let Err(e) = self.validate_member(&candidate, Some(&previous)) {
            return Err(self.reject(e));
        }

        let member = match self.remote_store() {
            Some(store) => {
                let saved = match store.update_member(id, &update).await {
                    Ok(saved) => saved,
                    Err(e) => {
                        return Err(self.mutation_failed("Failed to update team member.", e))
                    }
                };

                if saved.name != previous.name {
                    if let Err(e) = store.rename_leave_employee(id, &saved.name).await {
                        let restore = MemberUpdate::from(&previous);
                        if let Err(undo) = store.update_member(id, &restore).await {
                            tracing::error!(member_id = id, "Failed to restore member: {}", undo);
                            return Err(self.mutation_failed(REMOTE_INCONSISTENT, e));
                        }
                        return Err(self.mutation_failed("Failed to update team member.", e));
                    }
                }
                saved
            }
            None => candidate,
        };

        if let Some(slot) = self.members.iter_mut().find(|m| m.id == id) {
            *slot = member.clone();
        }
        for leave in self.leave_requests.iter_mut().filter(|l| l.employee_id == id) {
            leave.employee_name = member.name.clone();
        }

        self.persist(&[Collection::Members, Collection::LeaveRequests])
            .await;
        self.succeed("Team member updated successfully!");
        Ok(member)
    }

    /// Delete a member together with all of their leave requests.
    pub async fn delete_member(&mut self, id: &str) -> Result<TeamMember, AppError> {
        let Some(member) = self.members.iter().find(|m| m.id == id).cloned() else {
            return Err(self.reject(AppError::NotFound(format!("Member {} not found", id))));
        };

        if let Some(store) = self.remote_store() {
            let owned: Vec<LeaveRequest> = self
                .leave_requests
                .iter()
                .filter(|l| l.employee_id == id)
                .cloned()
                .collect();

            if let Err(e) = store.delete_leave_requests_for(id).await {
                return Err(self.mutation_failed("Failed to delete team member.", e));
            }

            if let Err(e) = store.delete_member(id).await {
                let mut restored = true;
                for leave in &owned {
                    if let Err(undo) = store.insert_leave_request(leave).await {
                        tracing::error!(leave_id = %leave.id, "Failed to restore leave request: {}", undo);
                        restored = false;
                    }
                }
                let message = if restored {
                    "Failed to delete team member."
                } else {
                    REMOTE_INCONSISTENT
                };
                return Err(self.mutation_failed(message, e));
            }
        }

        self.members.retain(|m| m.id != id);
        self.leave_requests.retain(|l| l.employee_id != id);

        self.persist(&[Collection::Members, Collection::LeaveRequests])
            .await;
        self.succeed("Team member deleted successfully!");
        Ok(member)
    }

    fn validate_member(
        &self,
        candidate: &TeamMember,
        previous: Option<&TeamMember>,
    ) -> Result<(), AppError> {
        if candidate.name.is_empty() || candidate.email.is_empty() || candidate.department.is_empty()
        {
            return Err(AppError::Validation(
                "Name, email and department are required".to_string(),
            ));
        }

        if self
            .members
            .iter()
            .any(|m| m.id != candidate.id && m.has_email(&candidate.email))
        {
            return Err(AppError::constraint(
                "A team member with this email already exists",
            ));
        }

        let department_changed = previous.map_or(true, |p| p.department != candidate.department);
        if department_changed
            && !self
                .departments
                .iter()
                .any(|d| d.name == candidate.department)
        {
            return Err(AppError::Validation(format!(
                "Unknown department \"{}\"",
                candidate.department
            )));
        }

        Ok(())
    }
}
