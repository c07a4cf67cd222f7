//! Leave request mutations.

use super::{new_id, today, SyncSession};
use crate::errors::AppError;
use crate::local::Collection;
use crate::models::{LeaveRequest, LeaveUpdate, NewLeaveRequest};

impl SyncSession {
    /// Submit leave for an existing member. The newest request goes first.
    pub async fn submit_leave(
        &mut self,
        request: NewLeaveRequest,
    ) -> Result<LeaveRequest, AppError> {
        let Some(member) = self
            .members
            .iter()
            .find(|m| m.id == request.employee_id)
            .cloned()
        else {
            return Err(self.reject(AppError::Validation(format!(
                "Unknown team member {}",
                request.employee_id
            ))));
        };

        let leave = LeaveRequest {
            id: new_id(),
            employee_name: member.name,
            employee_id: member.id,
            start_date: request.start_date,
            end_date: request.end_date,
            leave_type: request.leave_type,
            reason: request.reason.trim().to_string(),
            submitted_date: today(),
        };

        if let Err(e) = validate_leave(&leave) {
            return Err(self.reject(e));
        }

        let leave = match self.remote_store() {
            Some(store) => match store.insert_leave_request(&leave).await {
                Ok(saved) => saved,
                Err(e) => return Err(self.mutation_failed("Failed to submit leave request.", e)),
            },
            None => leave,
        };

        self.leave_requests.insert(0, leave.clone());
        self.persist(&[Collection::LeaveRequests]).await;
        self.succeed("Leave request submitted successfully!");
        Ok(leave)
    }

    pub async fn edit_leave(
        &mut self,
        id: &str,
        update: LeaveUpdate,
    ) -> Result<LeaveRequest, AppError> {
        let Some(previous) = self.leave_requests.iter().find(|l| l.id == id).cloned() else {
            return Err(self.reject(AppError::NotFound(format!(
                "Leave request {} not found",
                id
            ))));
        };

        let update = LeaveUpdate {
            reason: update.reason.trim().to_string(),
            ..update
        };
        let candidate = LeaveRequest {
            start_date: update.start_date,
            end_date: update.end_date,
            leave_type: update.leave_type,
            reason: update.reason.clone(),
            ..previous
        };

        if let Err(e) = validate_leave(&candidate) {
            return Err(self.reject(e));
        }

        let leave = match self.remote_store() {
            Some(store) => match store.update_leave_request(id, &update).await {
                Ok(saved) => saved,
                Err(e) => return Err(self.mutation_failed("Failed to update leave request.", e)),
            },
            None => candidate,
        };

        if let Some(slot) = self.leave_requests.iter_mut().find(|l| l.id == id) {
            *slot = leave.clone();
        }
        self.persist(&[Collection::LeaveRequests]).await;
        self.succeed("Leave request updated successfully!");
        Ok(leave)
    }

    pub async fn delete_leave(&mut self, id: &str) -> Result<LeaveRequest, AppError> {
        let Some(leave) = self.leave_requests.iter().find(|l| l.id == id).cloned() else {
            return Err(self.reject(AppError::NotFound(format!(
                "Leave request {} not found",
                id
            ))));
        };

        if let Some(store) = self.remote_store() {
            if let Err(e) = store.delete_leave_request(id).await {
                return Err(self.mutation_failed("Failed to delete leave request.", e));
            }
        }

        self.leave_requests.retain(|l| l.id != id);
        self.persist(&[Collection::LeaveRequests]).await;
        self.succeed("Leave request deleted successfully!");
        Ok(leave)
    }
}

fn validate_leave(leave: &LeaveRequest) -> Result<(), AppError> {
    if leave.start_date > leave.end_date {
        return Err(AppError::Validation(
            "End date must be on or after the start date".to_string(),
        ));
    }
    if leave.reason.is_empty() {
        return Err(AppError::Validation("A reason is required".to_string()));
    }
    Ok(())
}
